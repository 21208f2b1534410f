//! Environment layering.
//!
//! The environment a compiler runs with is built from ordered layers, lowest
//! precedence first:
//!
//! 1. the process environment captured at startup ([`EnvSnapshot`])
//! 2. the config's global `env`
//! 3. the container's `env` (only when delegating to a container)
//! 4. the target's own `env`
//!
//! A key set in a later layer replaces the same key from any earlier one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

/// Environment variables, ordered by key.
pub type EnvMap = BTreeMap<String, String>;

/// The process environment, read once at startup.
///
/// Nothing downstream reads the live environment; the snapshot is passed
/// explicitly so composition stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot(EnvMap);

impl EnvSnapshot {
  /// Capture the current process environment.
  ///
  /// Entries that aren't valid UTF-8 are skipped.
  pub fn capture() -> Self {
    let mut vars = EnvMap::new();
    for (key, value) in std::env::vars_os() {
      match (key.into_string(), value.into_string()) {
        (Ok(key), Ok(value)) => {
          vars.insert(key, value);
        }
        (key, _) => debug!(key = ?key, "skipping non-UTF-8 environment entry"),
      }
    }
    Self(vars)
  }

  pub fn from_map(vars: EnvMap) -> Self {
    Self(vars)
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn as_map(&self) -> &EnvMap {
    &self.0
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Merge environment layers. Later layers win key-for-key; `None` layers
/// contribute nothing.
pub fn compose(base: &EnvMap, global: &EnvMap, scope: Option<&EnvMap>, target: Option<&EnvMap>) -> EnvMap {
  let mut out = base.clone();
  for layer in [Some(global), scope, target].into_iter().flatten() {
    for (key, value) in layer {
      out.insert(key.clone(), value.clone());
    }
  }
  out
}

/// Entries of `composed` that are new or differ from `base`.
pub fn diff(base: &EnvMap, composed: &EnvMap) -> EnvMap {
  composed
    .iter()
    .filter(|(key, value)| base.get(*key) != Some(*value))
    .map(|(key, value)| (key.clone(), value.clone()))
    .collect()
}

/// How much of the environment a dry-run prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvDisplay {
  /// The full composed environment.
  All,
  /// Only variables added or changed relative to the process environment.
  #[default]
  Diff,
  /// No environment section.
  None,
}

impl EnvDisplay {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Diff => "diff",
      Self::None => "none",
    }
  }

  /// Variables to print for a target, or `None` when the section is suppressed.
  pub fn select(self, base: &EnvMap, composed: &EnvMap) -> Option<EnvMap> {
    match self {
      Self::All => Some(composed.clone()),
      Self::Diff => Some(diff(base, composed)),
      Self::None => None,
    }
  }
}

impl fmt::Display for EnvDisplay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EnvDisplay {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "all" => Ok(Self::All),
      "diff" => Ok(Self::Diff),
      "none" => Ok(Self::None),
      other => Err(format!("unknown env display mode '{other}' (expected all, diff or none)")),
    }
  }
}
