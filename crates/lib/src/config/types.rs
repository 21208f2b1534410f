use std::path::Path;

use serde::Deserialize;

use super::de;
use crate::consts::{
  APP_NAME, DEFAULT_BUILD_DIR, DEFAULT_CONTAINER_IMAGE, DEFAULT_CONTAINER_SHELL, DEFAULT_CONTAINER_WORKDIR,
  DEFAULT_SOURCE,
};
use crate::env::EnvMap;
use crate::target::TargetSet;

/// Root of a `.gobuilder.yml` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Directory under which per-target artifacts are placed.
  pub build_dir: String,

  /// Package or file handed to the compiler.
  pub source: String,

  /// Base name of produced artifacts.
  pub output: String,

  /// Global environment, applied to every target.
  #[serde(deserialize_with = "de::scalar_map")]
  pub env: EnvMap,

  pub build: BuildSettings,

  pub targets: Vec<Target>,

  /// When present, the whole matrix is delegated to a container.
  #[serde(alias = "container")]
  pub docker: Option<ContainerSpec>,
}

impl BuildConfig {
  /// Parse a configuration document.
  pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(content)
  }

  pub fn effective_build_dir(&self) -> &str {
    if self.build_dir.is_empty() {
      DEFAULT_BUILD_DIR
    } else {
      &self.build_dir
    }
  }

  pub fn effective_source(&self) -> &str {
    if self.source.is_empty() {
      DEFAULT_SOURCE
    } else {
      &self.source
    }
  }

  /// Name given to artifacts that don't override their output path.
  ///
  /// Falls back to the last component of the source path, then to the
  /// project directory's name.
  pub fn base_output_name(&self, project_dir: &Path) -> String {
    if !self.output.is_empty() {
      return self.output.clone();
    }

    let from_source = Path::new(self.effective_source())
      .file_name()
      .map(|name| name.to_string_lossy().into_owned());
    if let Some(name) = from_source {
      return name;
    }

    dunce::canonicalize(project_dir)
      .ok()
      .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
      .unwrap_or_else(|| APP_NAME.to_string())
  }

  /// Declared targets, or the implicit host target when none are declared.
  pub fn target_set(&self) -> TargetSet {
    if self.targets.is_empty() {
      TargetSet::ImplicitHost
    } else {
      TargetSet::Explicit(self.targets.clone())
    }
  }
}

/// Compiler flags shared by every target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
  /// Build tags. Duplicates are dropped, first occurrence wins the position.
  pub tags: StringList,

  /// Literal linker flags, concatenated in order.
  pub ldflags: StringList,

  /// Link-time variable assignments, one `-X` per entry.
  #[serde(deserialize_with = "de::scalar_map")]
  pub vars: EnvMap,

  pub gcflags: String,

  pub asmflags: String,

  /// Module download mode (`readonly`, `vendor`, `mod`).
  #[serde(rename = "mod")]
  pub module_mode: String,

  pub race: bool,

  pub trimpath: bool,

  pub verbose: bool,

  /// Forces dry-run for every invocation of this config.
  pub debug: bool,

  /// Verify produced artifacts are statically linked.
  pub verify_static: bool,
}

/// One (platform, architecture) pair to build for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Target {
  #[serde(deserialize_with = "de::scalar_string")]
  pub os: String,

  #[serde(deserialize_with = "de::scalar_string")]
  pub arch: String,

  /// Explicit artifact path. Empty means derive it from the build dir.
  #[serde(default, deserialize_with = "de::scalar_string")]
  pub output: String,

  #[serde(default, deserialize_with = "de::scalar_map")]
  pub env: EnvMap,

  #[serde(default)]
  pub verify_static: StaticOverride,
}

impl Target {
  pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
      ..Default::default()
    }
  }
}

/// Per-target override of the global static-link check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum StaticOverride {
  /// Use the global `build.verify_static` setting.
  #[default]
  Inherit,
  /// Always verify this target.
  Enforce,
  /// Never verify this target.
  Skip,
}

impl From<Option<bool>> for StaticOverride {
  fn from(value: Option<bool>) -> Self {
    match value {
      None => Self::Inherit,
      Some(true) => Self::Enforce,
      Some(false) => Self::Skip,
    }
  }
}

impl StaticOverride {
  /// Effective setting given the global flag.
  pub fn resolve(self, global: bool) -> bool {
    match self {
      Self::Inherit => global,
      Self::Enforce => true,
      Self::Skip => false,
    }
  }
}

/// Settings for delegating the build to a disposable container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerSpec {
  pub image: String,

  /// Where the project directory is mounted inside the container.
  pub workdir: String,

  pub shell: String,

  /// Commands run once, before the delegated build.
  pub setup: StringList,

  #[serde(deserialize_with = "de::scalar_map")]
  pub env: EnvMap,

  /// Program re-invoked inside the container to run the matrix.
  pub builder: String,
}

impl ContainerSpec {
  pub fn image(&self) -> &str {
    or_default(&self.image, DEFAULT_CONTAINER_IMAGE)
  }

  pub fn workdir(&self) -> &str {
    or_default(&self.workdir, DEFAULT_CONTAINER_WORKDIR)
  }

  pub fn shell(&self) -> &str {
    or_default(&self.shell, DEFAULT_CONTAINER_SHELL)
  }

  pub fn builder(&self) -> &str {
    or_default(&self.builder, APP_NAME)
  }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
  if value.is_empty() { default } else { value }
}

/// A list of strings that accepts a lone scalar in YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<OneOrMany>")]
pub struct StringList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
  One(String),
  Many(Vec<String>),
}

impl From<Option<OneOrMany>> for StringList {
  fn from(value: Option<OneOrMany>) -> Self {
    match value {
      None => Self::default(),
      Some(OneOrMany::One(s)) => Self(vec![s]),
      Some(OneOrMany::Many(v)) => Self(v),
    }
  }
}

impl StringList {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, String> {
    self.0.iter()
  }
}

impl<S: Into<String>> FromIterator<S> for StringList {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const FULL_CONFIG: &str = r#"
build_dir: dist
source: ./cmd/app
output: app
env:
  CGO_ENABLED: 0
build:
  tags: [netgo, osusergo]
  ldflags: "-s -w"
  vars:
    main.version: 1.2.3
  trimpath: true
  mod: readonly
  verify_static: true
targets:
  - os: linux
    arch: amd64
  - os: windows
    arch: 386
    output: dist/win.exe
    env:
      CGO_ENABLED: 1
    verify_static: false
docker:
  image: golang:1.22
  setup: go install example.com/gobuilder@latest
  env:
    GOFLAGS: -mod=mod
"#;

  #[test]
  fn parses_full_document() {
    let cfg = BuildConfig::from_yaml(FULL_CONFIG).unwrap();

    assert_eq!(cfg.effective_build_dir(), "dist");
    assert_eq!(cfg.env["CGO_ENABLED"], "0");
    assert_eq!(cfg.build.tags, StringList::from_iter(["netgo", "osusergo"]));
    assert_eq!(cfg.build.ldflags, StringList::from_iter(["-s -w"]));
    assert_eq!(cfg.build.vars["main.version"], "1.2.3");
    assert_eq!(cfg.build.module_mode, "readonly");
    assert!(cfg.build.trimpath);
    assert_eq!(cfg.targets.len(), 2);
    assert_eq!(cfg.targets[1].arch, "386");
    assert_eq!(cfg.targets[1].env["CGO_ENABLED"], "1");
    assert_eq!(cfg.targets[0].verify_static, StaticOverride::Inherit);
    assert_eq!(cfg.targets[1].verify_static, StaticOverride::Skip);

    let docker = cfg.docker.unwrap();
    assert_eq!(docker.image(), "golang:1.22");
    assert_eq!(docker.workdir(), DEFAULT_CONTAINER_WORKDIR);
    assert_eq!(docker.shell(), DEFAULT_CONTAINER_SHELL);
    assert_eq!(docker.builder(), APP_NAME);
    assert_eq!(docker.setup.0, vec!["go install example.com/gobuilder@latest"]);
  }

  #[test]
  fn empty_document_uses_defaults() {
    let cfg = BuildConfig::from_yaml("{}").unwrap();

    assert_eq!(cfg.effective_build_dir(), DEFAULT_BUILD_DIR);
    assert_eq!(cfg.effective_source(), DEFAULT_SOURCE);
    assert!(cfg.docker.is_none());
    assert_eq!(cfg.target_set(), TargetSet::ImplicitHost);
  }

  #[test]
  fn container_alias_is_accepted() {
    let cfg = BuildConfig::from_yaml("container:\n  image: alpine\n").unwrap();

    assert_eq!(cfg.docker.unwrap().image(), "alpine");
  }

  #[test]
  fn null_string_list_is_empty() {
    let cfg = BuildConfig::from_yaml("build:\n  ldflags:\n").unwrap();

    assert!(cfg.build.ldflags.is_empty());
  }

  #[test]
  fn target_requires_os_and_arch() {
    assert!(BuildConfig::from_yaml("targets:\n  - os: linux\n").is_err());
  }

  #[test]
  fn static_override_resolution() {
    assert!(StaticOverride::Inherit.resolve(true));
    assert!(!StaticOverride::Inherit.resolve(false));
    assert!(StaticOverride::Enforce.resolve(false));
    assert!(!StaticOverride::Skip.resolve(true));
  }

  #[test]
  fn base_output_name_prefers_explicit_output() {
    let cfg = BuildConfig {
      output: "tool".to_string(),
      source: "./cmd/server".to_string(),
      ..Default::default()
    };

    assert_eq!(cfg.base_output_name(Path::new(".")), "tool");
  }

  #[test]
  fn base_output_name_falls_back_to_source() {
    let cfg = BuildConfig {
      source: "./cmd/server".to_string(),
      ..Default::default()
    };

    assert_eq!(cfg.base_output_name(Path::new(".")), "server");
  }

  #[test]
  fn base_output_name_falls_back_to_project_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    let project = temp.path().join("widget");
    std::fs::create_dir(&project).unwrap();

    let cfg = BuildConfig::default();

    assert_eq!(cfg.base_output_name(&project), "widget");
  }
}
