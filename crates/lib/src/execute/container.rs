//! Container delegation.
//!
//! Instead of building on the host, the whole matrix runs inside a
//! disposable container: the project directory is bind-mounted at the
//! container's workdir, the setup commands run, then this program is invoked
//! again in executor mode so it builds inside the container.

use std::path::Path;

use serde::Serialize;

use crate::command::{quote, render_command};
use crate::config::{BuildConfig, ContainerSpec};
use crate::env::{self, EnvDisplay, EnvMap};

/// A fully composed container runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInvocation {
  pub program: String,
  pub image: String,
  pub args: Vec<String>,
}

impl ContainerInvocation {
  pub fn render(&self) -> String {
    render_command(&self.program, &self.args)
  }
}

/// Environment forwarded into the container: global env overlaid with the
/// container's env. The host's own environment is not forwarded.
pub fn container_env(config: &BuildConfig, spec: &ContainerSpec) -> EnvMap {
  env::compose(&EnvMap::new(), &config.env, Some(&spec.env), None)
}

/// The command line that runs the matrix inside the container.
pub fn executor_command(spec: &ContainerSpec, config_path: &Path, env_display: EnvDisplay) -> String {
  let args = [
    spec.builder().to_string(),
    "build".to_string(),
    "--no-container".to_string(),
    "--config".to_string(),
    config_path.to_string_lossy().into_owned(),
    "--env".to_string(),
    env_display.as_str().to_string(),
  ];
  args.iter().map(|a| quote(a)).collect::<Vec<_>>().join(" ")
}

/// The shell script run in the container: setup commands, then the executor.
pub fn container_script(spec: &ContainerSpec, config_path: &Path, env_display: EnvDisplay) -> String {
  spec
    .setup
    .iter()
    .filter(|cmd| !cmd.trim().is_empty())
    .cloned()
    .chain(std::iter::once(executor_command(spec, config_path, env_display)))
    .collect::<Vec<_>>()
    .join(" && ")
}

/// Compose the runtime invocation.
///
/// `host_dir` is the project directory on the host and `config_path` the
/// configuration file relative to it.
pub fn container_invocation(
  runtime: &str,
  config: &BuildConfig,
  spec: &ContainerSpec,
  host_dir: &Path,
  config_path: &Path,
  env_display: EnvDisplay,
) -> ContainerInvocation {
  let workdir = spec.workdir();

  let mut args = vec![
    "run".to_string(),
    "--rm".to_string(),
    "-w".to_string(),
    workdir.to_string(),
    "-v".to_string(),
    format!("{}:{}", host_dir.display(), workdir),
  ];

  for (key, value) in container_env(config, spec) {
    args.push("-e".to_string());
    args.push(format!("{key}={value}"));
  }

  args.push(spec.image().to_string());
  args.push(spec.shell().to_string());
  args.push("-c".to_string());
  args.push(container_script(spec, config_path, env_display));

  ContainerInvocation {
    program: runtime.to_string(),
    image: spec.image().to_string(),
    args,
  }
}
