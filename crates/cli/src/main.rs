mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gobuilder_lib::consts::{DEFAULT_COMPILER, DEFAULT_CONFIG_FILE, DEFAULT_CONTAINER_RUNTIME, DEFAULT_INSPECTOR};
use gobuilder_lib::env::EnvDisplay;
use gobuilder_lib::execute::{BuildError, ExecuteOptions, ExecutionMode, Programs};

use cmd::{cmd_build, cmd_info, cmd_init, cmd_plan};
use output::print_error;

/// Exit code for an artifact that was built but is dynamically linked.
const EXIT_VERIFICATION_FAILED: u8 = 3;

/// gobuilder - Declarative build matrices for Go
#[derive(Parser)]
#[command(name = "gobuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every target in the configuration
  Build {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print commands but do not execute
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Build on this machine even if a container is configured
    #[arg(long)]
    no_container: bool,

    #[command(flatten)]
    programs: ProgramArgs,
  },

  /// Print what a build would run
  Plan {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Plan a local build even if a container is configured
    #[arg(long)]
    no_container: bool,

    #[command(flatten)]
    programs: ProgramArgs,
  },

  /// Write a sample configuration file
  Init {
    /// Path of the configuration file to create
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overwrite an existing file without asking
    #[arg(short, long)]
    force: bool,
  },

  /// Show host platform and tool information
  Info {
    #[command(flatten)]
    programs: ProgramArgs,
  },
}

#[derive(Args)]
struct ConfigArgs {
  /// Path to the YAML configuration file
  #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Which environment variables to show in dry-run output
  #[arg(long, value_enum, default_value_t = EnvMode::Diff)]
  env: EnvMode,
}

#[derive(Args)]
struct ProgramArgs {
  /// Go toolchain command
  #[arg(long = "go", env = "GOBUILDER_GO", default_value = DEFAULT_COMPILER)]
  compiler: String,

  /// Container runtime command
  #[arg(long, env = "GOBUILDER_CONTAINER_RUNTIME", default_value = DEFAULT_CONTAINER_RUNTIME)]
  container_runtime: String,

  /// Artifact inspection command
  #[arg(long, env = "GOBUILDER_INSPECTOR", default_value = DEFAULT_INSPECTOR)]
  inspector: String,
}

impl From<ProgramArgs> for Programs {
  fn from(args: ProgramArgs) -> Self {
    Self {
      compiler: args.compiler,
      container_runtime: args.container_runtime,
      inspector: args.inspector,
    }
  }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EnvMode {
  /// Full environment
  All,
  /// Only variables added or changed by gobuilder
  Diff,
  /// No environment section
  None,
}

impl From<EnvMode> for EnvDisplay {
  fn from(mode: EnvMode) -> Self {
    match mode {
      EnvMode::All => EnvDisplay::All,
      EnvMode::Diff => EnvDisplay::Diff,
      EnvMode::None => EnvDisplay::None,
    }
  }
}

fn execute_options(config: ConfigArgs, programs: ProgramArgs, dry_run: bool, no_container: bool) -> ExecuteOptions {
  ExecuteOptions {
    config_path: config.config,
    dry_run,
    env_display: config.env.into(),
    mode: if no_container {
      ExecutionMode::Executor
    } else {
      ExecutionMode::Orchestrator
    },
    programs: programs.into(),
    ..Default::default()
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build {
      config,
      dry_run,
      no_container,
      programs,
    } => cmd_build(&execute_options(config, programs, dry_run, no_container)),
    Commands::Plan {
      config,
      json,
      no_container,
      programs,
    } => cmd_plan(&execute_options(config, programs, true, no_container), json),
    Commands::Init { config, force } => cmd_init(&config, force),
    Commands::Info { programs } => {
      cmd_info(&programs.into());
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      let verification_failed = err
        .downcast_ref::<BuildError>()
        .is_some_and(BuildError::is_verification_failure);
      if verification_failed {
        ExitCode::from(EXIT_VERIFICATION_FAILED)
      } else {
        ExitCode::FAILURE
      }
    }
  }
}
