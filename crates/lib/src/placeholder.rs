//! Placeholder expansion for configuration values.
//!
//! Any string in a configuration may reference the invoking environment:
//!
//! - `${NAME}` - value of `NAME`, or the empty string when unset
//! - `${NAME:-default}` - value of `NAME` when set and non-empty, else `default`
//!
//! The default text is inserted verbatim; it is not expanded again.
//!
//! # Leniency
//!
//! Expansion never fails. An unterminated `${` or an empty name is kept as
//! literal text, and a lone `$` (as in `$HOME`) passes through unchanged.
//!
//! # Example
//!
//! ```
//! use gobuilder_lib::env::EnvSnapshot;
//! use gobuilder_lib::placeholder::expand;
//!
//! let env: EnvSnapshot = [("VERSION", "2.0")].into_iter().collect();
//! assert_eq!(expand("v${VERSION:-dev}", &env), "v2.0");
//! assert_eq!(expand("${MISSING:-dev}", &env), "dev");
//! ```

use std::collections::BTreeMap;

use crate::config::{BuildConfig, BuildSettings, ContainerSpec, StringList, Target};
use crate::env::EnvSnapshot;

/// A `${...}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
  pub name: String,
  /// Text after `:-`, when present.
  pub default: Option<String>,
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no references)
  Literal(String),

  /// A reference to be resolved
  Reference(Reference),
}

/// Source of values for references.
pub trait Resolver {
  /// Value of `name`, if set.
  fn resolve(&self, name: &str) -> Option<&str>;
}

impl Resolver for EnvSnapshot {
  fn resolve(&self, name: &str) -> Option<&str> {
    self.get(name)
  }
}

/// Split a string into literal text and references.
///
/// Malformed references are folded into the surrounding literal text.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;

  while let Some(start) = rest.find("${") {
    literal.push_str(&rest[..start]);
    let after_open = &rest[start + 2..];

    let Some(close) = after_open.find('}') else {
      // Unterminated: keep everything from `${` on as text.
      literal.push_str(&rest[start..]);
      rest = "";
      break;
    };

    let content = &after_open[..close];
    match parse_reference(content) {
      Some(reference) => {
        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Reference(reference));
      }
      None => literal.push_str(&rest[start..start + 2 + close + 1]),
    }

    rest = &after_open[close + 1..];
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  segments
}

fn parse_reference(content: &str) -> Option<Reference> {
  let (name, default) = match content.split_once(":-") {
    Some((name, default)) => (name, Some(default.to_string())),
    None => (content, None),
  };

  if name.is_empty() {
    return None;
  }

  Some(Reference {
    name: name.to_string(),
    default,
  })
}

/// Expand every reference in `input`.
pub fn expand(input: &str, resolver: &impl Resolver) -> String {
  if !input.contains("${") {
    return input.to_string();
  }

  let mut out = String::with_capacity(input.len());
  for segment in parse(input) {
    match segment {
      Segment::Literal(text) => out.push_str(&text),
      Segment::Reference(Reference { name, default }) => {
        let value = resolver.resolve(&name);
        match default {
          Some(default) => match value {
            Some(v) if !v.is_empty() => out.push_str(v),
            _ => out.push_str(&default),
          },
          None => out.push_str(value.unwrap_or_default()),
        }
      }
    }
  }
  out
}

fn expand_list(list: &StringList, resolver: &impl Resolver) -> StringList {
  list.iter().map(|s| expand(s, resolver)).collect()
}

/// Expand both keys and values. If two keys expand to the same name, the one
/// that sorts last before expansion wins.
fn expand_map(map: &BTreeMap<String, String>, resolver: &impl Resolver) -> BTreeMap<String, String> {
  map
    .iter()
    .map(|(k, v)| (expand(k, resolver), expand(v, resolver)))
    .collect()
}

/// Produce a copy of `config` with every string field expanded.
///
/// Applied exactly once per invocation, before environments are composed or
/// output paths derived.
pub fn expand_config(config: &BuildConfig, resolver: &impl Resolver) -> BuildConfig {
  let build = &config.build;

  BuildConfig {
    build_dir: expand(&config.build_dir, resolver),
    source: expand(&config.source, resolver),
    output: expand(&config.output, resolver),
    env: expand_map(&config.env, resolver),
    build: BuildSettings {
      tags: expand_list(&build.tags, resolver),
      ldflags: expand_list(&build.ldflags, resolver),
      vars: expand_map(&build.vars, resolver),
      gcflags: expand(&build.gcflags, resolver),
      asmflags: expand(&build.asmflags, resolver),
      module_mode: expand(&build.module_mode, resolver),
      ..build.clone()
    },
    targets: config
      .targets
      .iter()
      .map(|t| Target {
        os: expand(&t.os, resolver),
        arch: expand(&t.arch, resolver),
        output: expand(&t.output, resolver),
        env: expand_map(&t.env, resolver),
        verify_static: t.verify_static,
      })
      .collect(),
    docker: config.docker.as_ref().map(|c| ContainerSpec {
      image: expand(&c.image, resolver),
      workdir: expand(&c.workdir, resolver),
      shell: expand(&c.shell, resolver),
      setup: expand_list(&c.setup, resolver),
      env: expand_map(&c.env, resolver),
      builder: expand(&c.builder, resolver),
    }),
  }
}
