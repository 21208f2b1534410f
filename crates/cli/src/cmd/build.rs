//! Implementation of the `gobuilder build` command.
//!
//! Loads the configuration and builds every target, either on this machine
//! or inside the configured container.

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use gobuilder_lib::env::EnvSnapshot;
use gobuilder_lib::execute::{ExecuteOptions, build};
use gobuilder_lib::util::format_duration;

use crate::output::{print_info, print_success};

/// Execute the build command.
///
/// The process environment is captured once here and used both for
/// placeholder expansion and as the base layer of every target environment.
///
/// # Errors
///
/// Fails on the first configuration, build-directory, compiler, container or
/// verification error; remaining targets are not built.
pub fn cmd_build(options: &ExecuteOptions) -> Result<()> {
  let base = EnvSnapshot::capture();
  debug!(vars = base.as_map().len(), mode = ?options.mode, "captured process environment");
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = {
    let mut stdout = io::stdout().lock();
    rt.block_on(build(options, &base, &mut stdout))
      .with_context(|| format!("Build failed for {}", options.config_path.display()))?
  };

  if report.dry_run {
    print_info("Dry-run: nothing was built");
  } else if report.delegated {
    print_success(&format!("Container build finished in {}", format_duration(started.elapsed())));
  } else {
    print_success(&format!(
      "Built {} artifact(s) in {}",
      report.artifacts.len(),
      format_duration(started.elapsed())
    ));
  }

  Ok(())
}
