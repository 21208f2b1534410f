//! Build planning.
//!
//! A plan is everything a build will do, decided up front: either hand the
//! matrix to a container, or run one compiler invocation per target. Nothing
//! here touches the filesystem beyond canonicalizing the project directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::container::{ContainerInvocation, container_invocation};
use super::types::{ExecuteOptions, ExecutionMode};
use crate::command::compose_args;
use crate::config::BuildConfig;
use crate::env::{EnvDisplay, EnvMap, EnvSnapshot};
use crate::platform::Platform;
use crate::target::{ResolveError, ResolvedTarget, resolve_targets};

/// Errors that can occur while planning.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("failed to resolve project directory {}: {source}", path.display())]
  ProjectDir { path: PathBuf, source: std::io::Error },
}

/// One compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBuild {
  pub target: ResolvedTarget,
  pub args: Vec<String>,
}

/// What a build will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
  /// Run the whole matrix inside a container.
  Delegate(ContainerInvocation),
  /// Build each target on this machine, in order.
  Matrix(Vec<TargetBuild>),
}

/// Plan a build for an expanded config.
///
/// Targets are resolved even when the build is delegated, so conflicting
/// outputs are reported before the container is started.
///
/// # Errors
///
/// [`PlanError::Resolve`] if two targets share an output path.
pub fn plan(config: &BuildConfig, base: &EnvSnapshot, options: &ExecuteOptions) -> Result<Plan, PlanError> {
  let targets = resolve_targets(config, base, &options.project_dir)?;

  if let Some(spec) = &config.docker {
    if options.mode == ExecutionMode::Orchestrator {
      let host_dir = dunce::canonicalize(&options.project_dir).map_err(|source| PlanError::ProjectDir {
        path: options.project_dir.clone(),
        source,
      })?;
      let config_path = container_config_path(&options.config_path, &options.project_dir, &host_dir);

      debug!(image = %spec.image(), host_dir = %host_dir.display(), "delegating build to container");
      return Ok(Plan::Delegate(container_invocation(
        &options.programs.container_runtime,
        config,
        spec,
        &host_dir,
        &config_path,
        options.env_display,
      )));
    }
  }

  let source = config.effective_source();
  let builds = targets
    .into_iter()
    .map(|target| TargetBuild {
      args: compose_args(&config.build, source, &target.output),
      target,
    })
    .collect();

  Ok(Plan::Matrix(builds))
}

/// Path of the config file as seen from the container workdir.
fn container_config_path(config_path: &Path, project_dir: &Path, host_dir: &Path) -> PathBuf {
  if config_path.is_relative() {
    return config_path.to_path_buf();
  }

  for root in [project_dir, host_dir] {
    if let Ok(relative) = config_path.strip_prefix(root) {
      return relative.to_path_buf();
    }
  }

  warn!(config = %config_path.display(), "config file is outside the project directory and may not exist in the container");
  config_path.to_path_buf()
}

/// Serializable view of a plan, for `plan --json`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlanReport {
  Container(ContainerInvocation),
  Matrix { targets: Vec<TargetReport> },
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
  pub platform: Platform,
  pub output: PathBuf,
  pub implicit: bool,
  pub verify_static: bool,
  pub program: String,
  pub args: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub env: Option<EnvMap>,
}

impl Plan {
  pub fn report(&self, base: &EnvSnapshot, env_display: EnvDisplay, compiler: &str) -> PlanReport {
    match self {
      Self::Delegate(invocation) => PlanReport::Container(invocation.clone()),
      Self::Matrix(builds) => PlanReport::Matrix {
        targets: builds
          .iter()
          .map(|build| TargetReport {
            platform: build.target.platform.clone(),
            output: build.target.output.clone(),
            implicit: build.target.implicit,
            verify_static: build.target.verify_static,
            program: compiler.to_string(),
            args: build.args.clone(),
            env: env_display.select(base.as_map(), &build.target.env),
          })
          .collect(),
      },
    }
  }
}
