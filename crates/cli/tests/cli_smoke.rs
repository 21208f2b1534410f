//! CLI smoke tests for gobuilder.
//!
//! These tests run the binary against throwaway projects and check exit
//! codes and printed output. No Go toolchain is needed: builds use a fake
//! compiler script.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the gobuilder binary, isolated from the caller's overrides.
fn gobuilder_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("gobuilder");
  cmd
    .env_remove("GOBUILDER_GO")
    .env_remove("GOBUILDER_CONTAINER_RUNTIME")
    .env_remove("GOBUILDER_INSPECTOR")
    .env_remove("RUST_LOG");
  cmd
}

/// Create a temp project with a `.gobuilder.yml`.
fn temp_project(content: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join(".gobuilder.yml"), content).unwrap();
  temp
}

const MATRIX_CONFIG: &str = r#"
output: app
env:
  CGO_ENABLED: 0
build:
  ldflags: "-s -w"
  vars:
    main.version: ${APP_VERSION:-dev}
targets:
  - os: linux
    arch: amd64
  - os: windows
    arch: amd64
"#;

const CONTAINER_CONFIG: &str = r#"
output: app
docker:
  image: golang:1.22
  setup:
    - go version
"#;

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  gobuilder_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  gobuilder_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("gobuilder"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "plan", "init", "info"] {
    gobuilder_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn info_shows_host_platform() {
  gobuilder_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Host platform"))
    .stdout(predicate::str::contains("Compiler: go"));
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn init_writes_sample_config() {
  let temp = TempDir::new().unwrap();

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("init")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote .gobuilder.yml"));

  let content = fs::read_to_string(temp.path().join(".gobuilder.yml")).unwrap();
  assert!(content.contains("targets:"));
}

#[test]
fn init_refuses_overwrite_without_terminal() {
  let temp = temp_project("output: mine\n");

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("init")
    .write_stdin("y\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));

  assert_eq!(
    fs::read_to_string(temp.path().join(".gobuilder.yml")).unwrap(),
    "output: mine\n"
  );
}

#[test]
fn init_force_overwrites() {
  let temp = temp_project("output: mine\n");

  gobuilder_cmd()
    .current_dir(temp.path())
    .args(["init", "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Replaced"));
}

// =============================================================================
// Plan
// =============================================================================

#[test]
fn plan_prints_commands_per_target() {
  let temp = temp_project(MATRIX_CONFIG);

  gobuilder_cmd()
    .current_dir(temp.path())
    .env_remove("APP_VERSION")
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains(">>> Building linux/amd64 -> builds/linux/amd64/app"))
    .stdout(predicate::str::contains(">>> Building windows/amd64 -> builds/windows/amd64/app.exe"))
    .stdout(predicate::str::contains("GOOS=windows \\"))
    .stdout(predicate::str::contains("main.version=dev"));

  // Planning leaves the project untouched.
  assert!(!temp.path().join("builds").exists());
  assert!(!temp.path().join(".gitignore").exists());
}

#[test]
fn plan_expands_placeholders_from_environment() {
  let temp = temp_project(MATRIX_CONFIG);

  gobuilder_cmd()
    .current_dir(temp.path())
    .env("APP_VERSION", "2.0")
    .args(["plan", "--env", "none"])
    .assert()
    .success()
    .stdout(predicate::str::contains("main.version=2.0"))
    .stdout(predicate::str::contains("GOOS=").not());
}

#[test]
fn plan_json_lists_targets() {
  let temp = temp_project(MATRIX_CONFIG);

  let output = gobuilder_cmd()
    .current_dir(temp.path())
    .env_remove("CGO_ENABLED")
    .args(["plan", "--json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["mode"], "matrix");
  assert_eq!(json["targets"].as_array().unwrap().len(), 2);
  assert_eq!(json["targets"][1]["output"], "builds/windows/amd64/app.exe");
  assert_eq!(json["targets"][0]["env"]["CGO_ENABLED"], "0");
}

#[test]
fn plan_container_shows_runtime_command() {
  let temp = temp_project(CONTAINER_CONFIG);

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("# Dry-run: docker run --rm -w /work -v "))
    .stdout(predicate::str::contains("golang:1.22 sh -c"));
}

#[test]
fn plan_without_container() {
  let temp = temp_project(CONTAINER_CONFIG);

  gobuilder_cmd()
    .current_dir(temp.path())
    .args(["plan", "--no-container"])
    .assert()
    .success()
    .stdout(predicate::str::contains(">>> Building"))
    .stdout(predicate::str::contains("docker").not());
}

#[test]
fn plan_uses_named_config() {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join("release.yml"), MATRIX_CONFIG).unwrap();

  gobuilder_cmd()
    .current_dir(temp.path())
    .args(["plan", "-c", "release.yml"])
    .assert()
    .success()
    .stdout(predicate::str::contains("linux/amd64"));
}

#[test]
fn missing_config_fails() {
  let temp = TempDir::new().unwrap();

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains(".gobuilder.yml"));
}

#[test]
fn malformed_config_fails() {
  let temp = temp_project("targets: [unterminated\n");

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("config error"));

  assert!(!temp.path().join("builds").exists());
}

#[test]
fn duplicate_outputs_fail() {
  let temp = temp_project(
    r#"
targets:
  - os: linux
    arch: amd64
    output: dist/app
  - os: linux
    arch: arm64
    output: dist/app
"#,
  );

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dist/app"));
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn build_dry_run_registers_build_dir() {
  let temp = temp_project(MATRIX_CONFIG);

  gobuilder_cmd()
    .current_dir(temp.path())
    .args(["build", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("# Dry-run:"))
    .stdout(predicate::str::contains("nothing was built"));

  assert!(temp.path().join("builds").is_dir());
  assert_eq!(fs::read_to_string(temp.path().join(".gitignore")).unwrap(), "builds/\n");
}

#[test]
fn build_rejects_unignored_build_dir() {
  let temp = temp_project(MATRIX_CONFIG);
  fs::create_dir(temp.path().join("builds")).unwrap();

  gobuilder_cmd()
    .current_dir(temp.path())
    .args(["build", "-n"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not in .gitignore"));
}

#[cfg(unix)]
fn fake_compiler(dir: &Path, body: &str) -> std::path::PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("fake-go");
  fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

#[cfg(unix)]
#[test]
fn build_runs_compiler_per_target() {
  let temp = temp_project(MATRIX_CONFIG);
  let tools = TempDir::new().unwrap();
  let compiler = fake_compiler(
    tools.path(),
    r#"echo "$GOOS/$GOARCH CGO_ENABLED=$CGO_ENABLED" >> calls.log
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then mkdir -p "$(dirname "$arg")" && touch "$arg"; fi
  prev="$arg"
done"#,
  );

  gobuilder_cmd()
    .current_dir(temp.path())
    .env("GOBUILDER_GO", &compiler)
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("✓ Completed in"))
    .stdout(predicate::str::contains("Built 2 artifact(s)"));

  assert_eq!(
    fs::read_to_string(temp.path().join("calls.log")).unwrap(),
    "linux/amd64 CGO_ENABLED=0\nwindows/amd64 CGO_ENABLED=0\n"
  );
  assert!(temp.path().join("builds/windows/amd64/app.exe").exists());
}

#[cfg(unix)]
#[test]
fn compiler_failure_stops_build() {
  let temp = temp_project(MATRIX_CONFIG);
  let tools = TempDir::new().unwrap();
  let compiler = fake_compiler(tools.path(), r#"echo "$GOOS" >> calls.log; exit 1"#);

  gobuilder_cmd()
    .current_dir(temp.path())
    .arg("build")
    .arg("--go")
    .arg(&compiler)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("build for linux/amd64 failed"));

  assert_eq!(fs::read_to_string(temp.path().join("calls.log")).unwrap(), "linux\n");
}

#[cfg(unix)]
#[test]
fn dynamic_artifact_fails_verification() {
  let temp = temp_project(
    r#"
output: app
build:
  verify_static: true
targets:
  - os: linux
    arch: amd64
"#,
  );
  let tools = TempDir::new().unwrap();
  let compiler = fake_compiler(tools.path(), "exit 0");
  let inspector = tools.path().join("fake-file");
  fs::write(&inspector, "#!/bin/sh\necho 'ELF 64-bit LSB executable, dynamically linked'\n").unwrap();
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&inspector, fs::Permissions::from_mode(0o755)).unwrap();
  }

  gobuilder_cmd()
    .current_dir(temp.path())
    .env("GOBUILDER_GO", &compiler)
    .env("GOBUILDER_INSPECTOR", &inspector)
    .arg("build")
    .assert()
    .code(3)
    .stderr(predicate::str::contains("dynamically linked"));
}
