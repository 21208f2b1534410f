/// CPU architecture of the host, in the compiler's vocabulary.
pub fn host_arch() -> &'static str {
  match std::env::consts::ARCH {
    "x86_64" => "amd64",
    "x86" => "386",
    "aarch64" => "arm64",
    "loongarch64" => "loong64",
    "wasm32" => "wasm",
    "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
    "powerpc64" => "ppc64",
    "mips64" if cfg!(target_endian = "little") => "mips64le",
    "mips" if cfg!(target_endian = "little") => "mipsle",
    other => other,
  }
}
