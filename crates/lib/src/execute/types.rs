//! Types for build execution.
//!
//! This module defines the error types, options and results for running a
//! build plan.

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{DEFAULT_COMPILER, DEFAULT_CONFIG_FILE, DEFAULT_CONTAINER_RUNTIME, DEFAULT_INSPECTOR};
use crate::env::EnvDisplay;
use crate::platform::Platform;

/// Errors that can occur while running a plan.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// An external program could not be started.
  #[error("failed to run {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  /// The compiler exited unsuccessfully.
  #[error("build for {platform} failed with exit code {code:?}")]
  CompilerFailed { platform: Platform, code: Option<i32> },

  /// The container runtime exited unsuccessfully.
  #[error("container build with {image} failed with exit code {code:?}")]
  ContainerFailed { image: String, code: Option<i32> },

  /// The artifact inspector exited unsuccessfully.
  #[error("inspecting {} failed with exit code {code:?}", artifact.display())]
  InspectFailed { artifact: PathBuf, code: Option<i32> },

  /// The artifact was built but links dynamically.
  #[error("{} for {platform} is dynamically linked: {description}", artifact.display())]
  StaticLinkViolation {
    artifact: PathBuf,
    platform: Platform,
    description: String,
  },

  /// Dry-run output could not be written.
  #[error("failed to write output: {0}")]
  Output(#[from] std::io::Error),
}

impl ExecuteError {
  /// True when the artifact exists but violates the linkage policy, as opposed
  /// to not having been built at all.
  pub fn is_verification_failure(&self) -> bool {
    matches!(self, Self::StaticLinkViolation { .. })
  }
}

/// Which role this invocation plays.
///
/// An orchestrator hands the matrix to a container when one is configured.
/// An executor always builds on the machine it runs on; it is what the
/// container runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
  #[default]
  Orchestrator,
  Executor,
}

/// External programs invoked during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
  pub compiler: String,
  pub container_runtime: String,
  pub inspector: String,
}

impl Default for Programs {
  fn default() -> Self {
    Self {
      compiler: DEFAULT_COMPILER.to_string(),
      container_runtime: DEFAULT_CONTAINER_RUNTIME.to_string(),
      inspector: DEFAULT_INSPECTOR.to_string(),
    }
  }
}

/// Options for one invocation.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
  /// Directory builds run in; relative paths in the config are relative to it.
  pub project_dir: PathBuf,

  /// Configuration file, as given by the user.
  pub config_path: PathBuf,

  /// Print instead of running. The config's `build.debug` also forces this.
  pub dry_run: bool,

  /// How much environment a dry-run prints.
  pub env_display: EnvDisplay,

  pub mode: ExecutionMode,

  pub programs: Programs,
}

impl Default for ExecuteOptions {
  fn default() -> Self {
    Self {
      project_dir: PathBuf::from("."),
      config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
      dry_run: false,
      env_display: EnvDisplay::default(),
      mode: ExecutionMode::default(),
      programs: Programs::default(),
    }
  }
}

/// Result of running a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
  /// The matrix was handed to a container.
  pub delegated: bool,

  /// Nothing was executed.
  pub dry_run: bool,

  /// Artifacts produced on this machine, in target order.
  pub artifacts: Vec<PathBuf>,
}
