//! Static-link verification of produced artifacts.
//!
//! The inspector (`file` by default) describes the artifact; the description
//! decides whether it depends on a dynamic loader.

use std::path::Path;

use tracing::{info, warn};

use super::process::run_captured;
use super::types::ExecuteError;
use crate::platform::Platform;

/// Linkage of an artifact, as far as the inspector can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
  Static,
  Dynamic,
  /// Inspector gave no linkage information (e.g. PE or Mach-O binaries).
  Unknown,
}

/// Classify an inspector description.
pub fn classify(description: &str) -> Linkage {
  let description = description.to_ascii_lowercase();

  if description.contains("dynamically linked") || description.contains("interpreter") {
    Linkage::Dynamic
  } else if description.contains("statically linked") || description.contains("static-pie linked") {
    Linkage::Static
  } else {
    Linkage::Unknown
  }
}

/// Inspect `artifact` and fail if it is dynamically linked.
///
/// # Errors
///
/// [`ExecuteError::StaticLinkViolation`] for a dynamic artifact,
/// [`ExecuteError::InspectFailed`] when the inspector itself fails.
pub async fn verify_static(
  inspector: &str,
  artifact: &Path,
  platform: &Platform,
  cwd: &Path,
) -> Result<Linkage, ExecuteError> {
  let args = vec!["-b".to_string(), artifact.to_string_lossy().into_owned()];
  let output = run_captured(inspector, &args, cwd).await?;

  if !output.status.success() {
    return Err(ExecuteError::InspectFailed {
      artifact: artifact.to_path_buf(),
      code: output.status.code(),
    });
  }

  let description = String::from_utf8_lossy(&output.stdout).trim().to_string();
  match classify(&description) {
    Linkage::Dynamic => Err(ExecuteError::StaticLinkViolation {
      artifact: artifact.to_path_buf(),
      platform: platform.clone(),
      description,
    }),
    Linkage::Static => {
      info!(artifact = %artifact.display(), "artifact is statically linked");
      Ok(Linkage::Static)
    }
    Linkage::Unknown => {
      warn!(artifact = %artifact.display(), description = %description, "could not determine linkage");
      Ok(Linkage::Unknown)
    }
  }
}
