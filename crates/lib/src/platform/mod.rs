pub mod arch;
pub mod os;

use std::fmt;

use serde::Serialize;

use crate::consts::WINDOWS_EXE_SUFFIX;

pub use arch::host_arch;
pub use os::{host_os, is_windows};

/// A compilation target platform (e.g., "linux/amd64")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Platform {
  pub os: String,
  pub arch: String,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
    }
  }

  /// The platform this process runs on
  pub fn host() -> Self {
    Self::new(host_os(), host_arch())
  }

  pub fn is_windows(&self) -> bool {
    is_windows(&self.os)
  }

  /// Suffix executables need on this platform, if any
  pub fn exe_suffix(&self) -> Option<&'static str> {
    self.is_windows().then_some(WINDOWS_EXE_SUFFIX)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}
