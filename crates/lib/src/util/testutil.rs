//! Test utilities for gobuilder-lib.
//!
//! Stand-ins for the external programs a build invokes, so tests can run the
//! real process plumbing without a compiler or container runtime installed.

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_program(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A fake compiler that records its arguments (one per line) and selected
/// environment variables into `record`, then creates the `-o` artifact.
#[cfg(unix)]
pub fn recording_compiler(dir: &Path, record: &Path) -> PathBuf {
  let body = format!(
    r#"for arg in "$@"; do echo "arg:$arg" >> '{record}'; done
echo "env:GOOS=$GOOS GOARCH=$GOARCH CGO_ENABLED=$CGO_ENABLED" >> '{record}'
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ]; then mkdir -p "$(dirname "$out")" && touch "$out"; fi"#,
    record = record.display()
  );
  fake_program(dir, "fake-go", &body)
}
