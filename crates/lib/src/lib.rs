//! gobuilder-lib: Core logic for gobuilder
//!
//! gobuilder turns a YAML description of a Go build matrix into compiler
//! invocations:
//! - `config`: the configuration document and its loader
//! - `placeholder`: `${NAME:-default}` expansion against the environment
//! - `target`: per-target output paths and environments
//! - `command`: the compiler argument vector
//! - `execute`: dry-run, local builds and container delegation

pub mod command;
pub mod config;
pub mod consts;
pub mod env;
pub mod execute;
pub mod init;
pub mod placeholder;
pub mod platform;
pub mod target;
pub mod util;
pub mod workspace;
