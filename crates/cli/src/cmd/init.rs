//! Implementation of the `gobuilder init` command.
//!
//! Writes a commented sample configuration to start from.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};

use gobuilder_lib::init::{InitOptions, init};

use crate::output::{print_success, symbols};
use crate::prompts::confirm_overwrite;

/// Execute the init command.
///
/// An existing file is only replaced with `--force` or after confirmation on
/// an interactive terminal.
pub fn cmd_init(path: &Path, force: bool) -> Result<()> {
  let force = force || (path.exists() && confirm_overwrite(path)?);

  if path.exists() && !force {
    bail!("Aborted: {} left unchanged", path.display());
  }

  let result = init(&InitOptions {
    path: path.to_path_buf(),
    force,
  })
  .context("Failed to write sample configuration")?;

  if result.overwritten {
    print_success(&format!("Replaced {}", result.path.display()));
  } else {
    print_success(&format!("Wrote {}", result.path.display()));
  }
  println!();
  println!("{}", "Next steps:".if_supports_color(Stream::Stdout, |s| s.bold()));
  println!("  {} Edit the targets and build settings", symbols::ARROW);
  println!(
    "  {} Run: {}",
    symbols::ARROW,
    "gobuilder plan".if_supports_color(Stream::Stdout, |s| s.cyan())
  );

  Ok(())
}
