//! Scaffold a sample configuration file.
//!
//! This module provides the core logic for `gobuilder init`. Asking before an
//! overwrite is the caller's job; here an existing file is an error unless
//! `force` is set.

mod templates;

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

pub use templates::CONFIG_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Options for writing the sample configuration.
pub struct InitOptions {
  /// Path of the configuration file to create
  pub path: PathBuf,
  /// Overwrite an existing file
  pub force: bool,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  pub path: PathBuf,
  /// An existing file was replaced
  pub overwritten: bool,
}

/// Write the sample configuration.
///
/// # Errors
///
/// Returns an error if:
/// - the file exists and `force` is not set
/// - the parent directory cannot be created
/// - the file cannot be written
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let path = &options.path;
  let exists = path.exists();

  if exists && !options.force {
    return Err(InitError::PathExists { path: path.clone() });
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|source| InitError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  fs::write(path, CONFIG_TEMPLATE).map_err(|source| InitError::WriteFile {
    path: path.clone(),
    source,
  })?;

  info!(path = %path.display(), overwritten = exists, "wrote sample configuration");
  Ok(InitResult {
    path: path.clone(),
    overwritten: exists,
  })
}
