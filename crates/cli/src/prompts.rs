use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Ask whether `path` may be overwritten. Defaults to no.
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!(
      "{} already exists and no terminal is available to confirm. Use --force to overwrite.",
      path.display()
    );
  }

  write!(io::stderr(), "{} already exists. Overwrite? [y/N] ", path.display())?;
  io::stderr().flush()?;

  let mut answer = String::new();
  io::stdin().read_line(&mut answer)?;

  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
