//! CLI output formatting utilities.
//!
//! Status lines around a build. The per-target progress and dry-run text are
//! written by the library; this module only frames them.

use std::fmt::Display;

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn print_success(message: impl Display) {
  let mark = symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green());
  println!("{mark} {message}");
}

/// Errors go to stderr so dry-run output on stdout stays pasteable.
pub fn print_error(message: impl Display) {
  let mark = symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red());
  let message = message.to_string();
  eprintln!("{mark} {}", message.if_supports_color(Stream::Stderr, |s| s.red()));
}

pub fn print_info(message: impl Display) {
  let mark = symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue());
  println!("{mark} {message}");
}

pub fn print_stat(label: &str, value: impl Display) {
  println!("  {}: {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize plan to JSON")?;
  println!("{json}");
  Ok(())
}
