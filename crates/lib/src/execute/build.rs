//! The `build` entry point.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use super::plan::{Plan, PlanError, plan};
use super::run;
use super::types::{BuildReport, ExecuteError, ExecuteOptions};
use crate::config::{BuildConfig, ConfigError, load_config};
use crate::env::EnvSnapshot;
use crate::placeholder::expand_config;
use crate::workspace::{WorkspaceError, ensure_build_dir};

/// Errors that can occur during a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The config could not be loaded.
  #[error("config error: {0}")]
  Config(#[from] ConfigError),

  /// The build directory could not be prepared.
  #[error("build directory error: {0}")]
  Workspace(#[from] WorkspaceError),

  /// Targets could not be resolved.
  #[error("planning error: {0}")]
  Plan(#[from] PlanError),

  /// A step of the build failed.
  #[error("execution error: {0}")]
  Execute(#[from] ExecuteError),
}

impl BuildError {
  /// True when an artifact was built but failed static-link verification.
  pub fn is_verification_failure(&self) -> bool {
    matches!(self, Self::Execute(e) if e.is_verification_failure())
  }
}

/// The config file path, resolved against the project directory.
pub fn config_file(options: &ExecuteOptions) -> PathBuf {
  options.project_dir.join(&options.config_path)
}

/// Load, expand and plan without side effects.
pub fn prepare(options: &ExecuteOptions, base: &EnvSnapshot) -> Result<(BuildConfig, Plan), BuildError> {
  let raw = load_config(&config_file(options))?;
  let config = expand_config(&raw, base);
  let plan = plan(&config, base, options)?;
  Ok((config, plan))
}

/// Run a build.
///
/// 1. Load and expand the config
/// 2. Resolve targets and plan
/// 3. Prepare the build directory
/// 4. Delegate to the container, or build each target
///
/// Dry-run is active when requested or when the config sets `build.debug`.
pub async fn build<W: Write>(
  options: &ExecuteOptions,
  base: &EnvSnapshot,
  out: &mut W,
) -> Result<BuildReport, BuildError> {
  info!(config = %options.config_path.display(), mode = ?options.mode, "starting build");

  let (config, plan) = prepare(options, base)?;

  let options = ExecuteOptions {
    dry_run: options.dry_run || config.build.debug,
    ..options.clone()
  };

  ensure_build_dir(&options.project_dir, config.effective_build_dir())?;

  let report = run(&plan, base, &options, out).await?;
  info!(
    artifacts = report.artifacts.len(),
    delegated = report.delegated,
    dry_run = report.dry_run,
    "build finished"
  );
  Ok(report)
}
