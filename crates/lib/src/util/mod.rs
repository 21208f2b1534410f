//! Shared utilities.

use std::time::Duration;

#[cfg(test)]
pub mod testutil;

/// Render a build duration: milliseconds under a second, minutes past one.
pub fn format_duration(duration: Duration) -> String {
  match duration.as_secs() {
    0 => format!("{}ms", duration.as_millis()),
    1..=59 => format!("{:.2}s", duration.as_secs_f64()),
    secs => format!("{}m {}s", secs / 60, secs % 60),
  }
}
