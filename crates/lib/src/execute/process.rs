//! External process helpers.
//!
//! Every external program (compiler, container runtime, inspector) is run to
//! completion before the next step starts. There is no timeout: a hung child
//! blocks the invocation.

use std::path::Path;
use std::process::{ExitStatus, Output};

use tokio::process::Command;
use tracing::debug;

use super::types::ExecuteError;
use crate::env::EnvMap;

fn command(program: &str, args: &[String], env: Option<&EnvMap>, cwd: &Path) -> Command {
  let mut command = Command::new(program);
  command.args(args).current_dir(cwd);

  // The composed environment already contains the inherited variables it
  // should; anything else must not leak in.
  if let Some(env) = env {
    command.env_clear().envs(env);
  }

  command
}

/// Run `program` with stdout/stderr inherited and wait for it.
pub async fn run_inherited(
  program: &str,
  args: &[String],
  env: Option<&EnvMap>,
  cwd: &Path,
) -> Result<ExitStatus, ExecuteError> {
  debug!(program = %program, args = ?args, cwd = %cwd.display(), "spawning process");

  let status = command(program, args, env, cwd)
    .status()
    .await
    .map_err(|source| ExecuteError::Spawn {
      program: program.to_string(),
      source,
    })?;

  debug!(program = %program, code = ?status.code(), "process exited");
  Ok(status)
}

/// Run `program` and collect its output.
pub async fn run_captured(program: &str, args: &[String], cwd: &Path) -> Result<Output, ExecuteError> {
  debug!(program = %program, args = ?args, "capturing process output");

  command(program, args, None, cwd)
    .output()
    .await
    .map_err(|source| ExecuteError::Spawn {
      program: program.to_string(),
      source,
    })
}
