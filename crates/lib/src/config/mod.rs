//! Build configuration loading.
//!
//! A configuration is a YAML document describing the build matrix: where
//! artifacts go, the compiler flags, the targets and an optional container to
//! delegate to. See [`BuildConfig`] for the layout.

mod de;
mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use types::{BuildConfig, BuildSettings, ContainerSpec, StaticOverride, StringList, Target};

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_yaml::Error },
}

/// Read and parse the configuration at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the file can't be read and
/// [`ConfigError::Parse`] when it isn't a valid configuration document.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
  let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let config = BuildConfig::from_yaml(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  debug!(
    path = %path.display(),
    targets = config.targets.len(),
    container = config.docker.is_some(),
    "loaded config"
  );

  Ok(config)
}
