//! Target resolution.
//!
//! Turns the declared targets (or the implicit host target) into concrete
//! builds: where the artifact goes, which environment the compiler sees and
//! whether the artifact must be checked for static linkage.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::{BuildConfig, Target};
use crate::consts::{ARCH_SELECTOR, OS_SELECTOR};
use crate::env::{self, EnvMap, EnvSnapshot};
use crate::platform::Platform;

/// What to build for.
///
/// An empty `targets` list is not an empty matrix: it means "build once, for
/// the host", which gets its own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSet {
  Explicit(Vec<Target>),
  ImplicitHost,
}

/// Errors that can occur while resolving targets.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("targets {first} and {second} both write to {}", path.display())]
  DuplicateOutput {
    path: PathBuf,
    first: Platform,
    second: Platform,
  },
}

/// A target with everything needed to compose and run its build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
  pub platform: Platform,

  /// Artifact path, relative to the project directory unless overridden
  /// with an absolute path.
  pub output: PathBuf,

  /// Full environment for the compiler process.
  pub env: EnvMap,

  /// Effective static-link check after applying the per-target override.
  pub verify_static: bool,

  /// True for the synthesized host target.
  pub implicit: bool,
}

/// Derive the artifact path for a target.
///
/// An explicit override is used as-is. Otherwise the path is
/// `build_dir/os/arch/base_name`, with the platform's executable suffix
/// appended unless the name already carries it.
pub fn output_path(build_dir: &str, platform: &Platform, base_name: &str, override_path: &str) -> PathBuf {
  if !override_path.is_empty() {
    return PathBuf::from(override_path);
  }

  let mut name = base_name.to_string();
  if let Some(suffix) = platform.exe_suffix() {
    if !has_suffix(&name, suffix) {
      name.push_str(suffix);
    }
  }

  Path::new(build_dir).join(&platform.os).join(&platform.arch).join(name)
}

fn has_suffix(name: &str, suffix: &str) -> bool {
  name
    .len()
    .checked_sub(suffix.len())
    .and_then(|start| name.get(start..))
    .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Resolve every target of an already-expanded config.
///
/// # Errors
///
/// Returns [`ResolveError::DuplicateOutput`] if two targets would write the
/// same artifact.
pub fn resolve_targets(
  config: &BuildConfig,
  base: &EnvSnapshot,
  project_dir: &Path,
) -> Result<Vec<ResolvedTarget>, ResolveError> {
  let build_dir = config.effective_build_dir();
  let base_name = config.base_output_name(project_dir);
  let global_verify = config.build.verify_static;

  let resolved: Vec<ResolvedTarget> = match config.target_set() {
    TargetSet::ImplicitHost => {
      let platform = Platform::host();
      vec![ResolvedTarget {
        output: output_path(build_dir, &platform, &base_name, ""),
        env: env::compose(base.as_map(), &config.env, None, None),
        verify_static: global_verify,
        implicit: true,
        platform,
      }]
    }
    TargetSet::Explicit(targets) => targets
      .iter()
      .map(|target| {
        let platform = Platform::new(&target.os, &target.arch);

        let mut env = env::compose(base.as_map(), &config.env, None, Some(&target.env));
        env.insert(OS_SELECTOR.to_string(), platform.os.clone());
        env.insert(ARCH_SELECTOR.to_string(), platform.arch.clone());

        ResolvedTarget {
          output: output_path(build_dir, &platform, &base_name, &target.output),
          env,
          verify_static: target.verify_static.resolve(global_verify),
          implicit: false,
          platform,
        }
      })
      .collect(),
  };

  let mut seen: HashMap<PathBuf, &Platform> = HashMap::new();
  for target in &resolved {
    if let Some(first) = seen.insert(normalize(project_dir, &target.output), &target.platform) {
      return Err(ResolveError::DuplicateOutput {
        path: target.output.clone(),
        first: first.clone(),
        second: target.platform.clone(),
      });
    }
  }

  debug!(count = resolved.len(), "resolved targets");
  Ok(resolved)
}

/// Lexically normalize `path` against `project_dir`, so that spellings like
/// `./out/app` and `out/../out/app` compare equal to `out/app`.
fn normalize(project_dir: &Path, path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in project_dir.join(path).components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
          normalized.pop();
        } else {
          normalized.push(component);
        }
      }
      other => normalized.push(other),
    }
  }
  normalized
}
