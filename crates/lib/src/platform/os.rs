/// Operating system identifier of the host, in the compiler's vocabulary.
///
/// Identical to Rust's names except macOS, which the compiler calls `darwin`.
pub fn host_os() -> &'static str {
  match std::env::consts::OS {
    "macos" => "darwin",
    other => other,
  }
}

/// Whether `os` names the Windows family, whose executables need a suffix.
pub fn is_windows(os: &str) -> bool {
  os.eq_ignore_ascii_case("windows")
}
