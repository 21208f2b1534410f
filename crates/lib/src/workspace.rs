//! Build directory bookkeeping.
//!
//! The build directory is owned by this tool only if it is listed in the
//! project's `.gitignore`. A fresh directory gets created and registered; an
//! existing directory that isn't ignored is treated as someone else's and
//! left alone.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

const GITIGNORE: &str = ".gitignore";

/// Errors that can occur while preparing the build directory.
#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("directory {} exists but is not in .gitignore", path.display())]
  NotIgnored { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to read {}: {source}", path.display())]
  ReadIgnore { path: PathBuf, source: std::io::Error },

  #[error("failed to update {}: {source}", path.display())]
  WriteIgnore { path: PathBuf, source: std::io::Error },
}

/// What [`ensure_build_dir`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDirState {
  /// Directory already existed and was ignored.
  Existing,
  /// Directory was created and added to `.gitignore`.
  Created,
}

/// Make sure `build_dir` (relative to `project_dir`) exists and is ignored.
///
/// # Errors
///
/// Returns [`WorkspaceError::NotIgnored`] when the directory exists but isn't
/// listed in `.gitignore`; nothing is created or modified in that case.
pub fn ensure_build_dir(project_dir: &Path, build_dir: &str) -> Result<BuildDirState, WorkspaceError> {
  let dir = project_dir.join(build_dir);

  if dir.is_dir() {
    if !is_ignored(project_dir, build_dir)? {
      return Err(WorkspaceError::NotIgnored { path: dir });
    }
    debug!(dir = %dir.display(), "build directory already present");
    return Ok(BuildDirState::Existing);
  }

  // The directory must never exist without its .gitignore entry.
  register_ignore(project_dir, build_dir)?;

  fs::create_dir_all(&dir).map_err(|source| WorkspaceError::CreateDir {
    path: dir.clone(),
    source,
  })?;
  info!(dir = %dir.display(), "created build directory");
  Ok(BuildDirState::Created)
}

fn normalize(entry: &str) -> &str {
  let entry = entry.trim();
  let entry = entry.strip_prefix('/').unwrap_or(entry);
  entry.strip_suffix('/').unwrap_or(entry)
}

/// Whether `.gitignore` in `project_dir` has a line naming `dir`.
///
/// Accepts `dir`, `dir/`, `/dir` and `/dir/`. A missing `.gitignore` means
/// nothing is ignored.
pub fn is_ignored(project_dir: &Path, dir: &str) -> Result<bool, WorkspaceError> {
  let path = project_dir.join(GITIGNORE);
  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
    Err(source) => return Err(WorkspaceError::ReadIgnore { path, source }),
  };

  let wanted = normalize(dir);
  Ok(content.lines().any(|line| normalize(line) == wanted))
}

fn register_ignore(project_dir: &Path, dir: &str) -> Result<(), WorkspaceError> {
  if is_ignored(project_dir, dir)? {
    return Ok(());
  }

  let path = project_dir.join(GITIGNORE);
  let write_err = |source| WorkspaceError::WriteIgnore {
    path: path.clone(),
    source,
  };

  // Keep the new entry on its own line even if the file lacks a trailing newline.
  let needs_newline = fs::read_to_string(&path)
    .map(|content| !content.is_empty() && !content.ends_with('\n'))
    .unwrap_or(false);

  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&path)
    .map_err(write_err)?;

  if needs_newline {
    writeln!(file).map_err(write_err)?;
  }
  writeln!(file, "{}/", normalize(dir)).map_err(write_err)?;

  debug!(entry = %dir, "registered build directory in .gitignore");
  Ok(())
}
