//! Build execution.
//!
//! This module runs a [`Plan`]:
//! - a delegated plan starts the container runtime once and is done
//! - a matrix plan builds each target in order, stopping at the first failure
//! - dry-run prints the environment and command for each step instead

pub mod build;
pub mod container;
pub mod plan;
pub mod process;
pub mod types;
pub mod verify;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::command::{quote, render_command};
use crate::env::EnvSnapshot;
use crate::util::format_duration;

use container::ContainerInvocation;
use plan::TargetBuild;
use process::run_inherited;
use verify::verify_static;

pub use build::{BuildError, build, config_file, prepare};
pub use plan::{Plan, PlanError, PlanReport};
pub use types::{BuildReport, ExecuteError, ExecuteOptions, ExecutionMode, Programs};

/// Execute a plan, writing progress and dry-run text to `out`.
///
/// # Errors
///
/// The first failing step aborts the run; remaining targets are not built.
pub async fn run<W: Write>(
  plan: &Plan,
  base: &EnvSnapshot,
  options: &ExecuteOptions,
  out: &mut W,
) -> Result<BuildReport, ExecuteError> {
  let mut report = BuildReport {
    dry_run: options.dry_run,
    ..Default::default()
  };

  match plan {
    Plan::Delegate(invocation) => {
      report.delegated = true;
      delegate(invocation, options, out).await?;
    }
    Plan::Matrix(builds) => {
      info!(targets = builds.len(), dry_run = options.dry_run, "building targets");
      for build in builds {
        if let Some(artifact) = build_target(build, base, options, out).await? {
          report.artifacts.push(artifact);
        }
      }
    }
  }

  Ok(report)
}

async fn delegate<W: Write>(
  invocation: &ContainerInvocation,
  options: &ExecuteOptions,
  out: &mut W,
) -> Result<(), ExecuteError> {
  if options.dry_run {
    writeln!(out, "# Dry-run: {}", invocation.render())?;
    return Ok(());
  }

  writeln!(out, ">>> Building in container {}", invocation.image)?;
  out.flush()?;

  let status = run_inherited(&invocation.program, &invocation.args, None, &options.project_dir).await?;
  if !status.success() {
    return Err(ExecuteError::ContainerFailed {
      image: invocation.image.clone(),
      code: status.code(),
    });
  }

  Ok(())
}

/// Build one target. Returns the artifact path unless this is a dry-run.
async fn build_target<W: Write>(
  build: &TargetBuild,
  base: &EnvSnapshot,
  options: &ExecuteOptions,
  out: &mut W,
) -> Result<Option<PathBuf>, ExecuteError> {
  let target = &build.target;
  let compiler = &options.programs.compiler;

  writeln!(out, ">>> Building {} -> {}", target.platform, target.output.display())?;

  if options.dry_run {
    write_dry_run(out, build, base, options)?;
    return Ok(None);
  }

  out.flush()?;
  let started = Instant::now();

  let status = run_inherited(compiler, &build.args, Some(&target.env), &options.project_dir).await?;
  if !status.success() {
    return Err(ExecuteError::CompilerFailed {
      platform: target.platform.clone(),
      code: status.code(),
    });
  }

  if target.verify_static {
    verify_static(&options.programs.inspector, &target.output, &target.platform, &options.project_dir).await?;
  } else {
    debug!(platform = %target.platform, "static-link check disabled");
  }

  writeln!(out, "✓ Completed in {}", format_duration(started.elapsed()))?;
  Ok(Some(target.output.clone()))
}

fn write_dry_run<W: Write>(
  out: &mut W,
  build: &TargetBuild,
  base: &EnvSnapshot,
  options: &ExecuteOptions,
) -> std::io::Result<()> {
  writeln!(out, "# Dry-run:")?;

  if let Some(vars) = options.env_display.select(base.as_map(), &build.target.env) {
    for (key, value) in vars {
      writeln!(out, "{key}={} \\", quote(&value))?;
    }
  }

  writeln!(out, "{}", render_command(&options.programs.compiler, &build.args))
}
