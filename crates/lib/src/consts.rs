/// Program name, also the default command re-invoked inside a container.
pub const APP_NAME: &str = "gobuilder";

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".gobuilder.yml";

/// Build directory used when the configuration leaves `build_dir` empty.
pub const DEFAULT_BUILD_DIR: &str = "builds";

/// Source path used when the configuration leaves `source` empty.
pub const DEFAULT_SOURCE: &str = ".";

pub const DEFAULT_CONTAINER_IMAGE: &str = "docker.io/golang:latest";
pub const DEFAULT_CONTAINER_WORKDIR: &str = "/work";
pub const DEFAULT_CONTAINER_SHELL: &str = "sh";

/// External programs, overridable per invocation.
pub const DEFAULT_COMPILER: &str = "go";
pub const DEFAULT_CONTAINER_RUNTIME: &str = "docker";
pub const DEFAULT_INSPECTOR: &str = "file";

/// Environment variables that select the compiler's target platform.
pub const OS_SELECTOR: &str = "GOOS";
pub const ARCH_SELECTOR: &str = "GOARCH";

/// Suffix required on executables for Windows-family targets.
pub const WINDOWS_EXE_SUFFIX: &str = ".exe";
