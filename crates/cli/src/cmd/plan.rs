//! Implementation of the `gobuilder plan` command.
//!
//! Prints what `gobuilder build` would run without touching the project:
//! the build directory is not created and no process is started.

use std::io;

use anyhow::{Context, Result};

use gobuilder_lib::env::EnvSnapshot;
use gobuilder_lib::execute::{ExecuteOptions, prepare, run};

use crate::output::print_json;

pub fn cmd_plan(options: &ExecuteOptions, json: bool) -> Result<()> {
  let base = EnvSnapshot::capture();

  let (_, plan) =
    prepare(options, &base).with_context(|| format!("Failed to plan {}", options.config_path.display()))?;

  if json {
    return print_json(&plan.report(&base, options.env_display, &options.programs.compiler));
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let mut stdout = io::stdout().lock();
  rt.block_on(run(&plan, &base, options, &mut stdout))
    .context("Failed to print plan")?;

  Ok(())
}
