//! Compiler command composition.
//!
//! Builds the argument vector for `go build` from [`BuildSettings`]. The
//! same vector is executed and printed in dry-run mode, so its order is
//! fixed:
//!
//! `build [-v] [-tags t1,t2] [-trimpath] [-gcflags ..] [-asmflags ..] [-mod ..]
//! [-race] [-ldflags ..] -o <output> <source>`

use std::collections::HashSet;
use std::path::Path;

use crate::config::{BuildSettings, StringList};
use crate::env::EnvMap;

/// Render link-time variables as `-X 'name=value'` and append them to the
/// literal link flags. Variables come out sorted by name.
pub fn compose_ldflags(ldflags: &StringList, vars: &EnvMap) -> String {
  ldflags
    .iter()
    .filter(|flag| !flag.is_empty())
    .cloned()
    .chain(vars.iter().map(|(name, value)| format!("-X '{name}={value}'")))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Join tags into one comma-separated token, dropping empties and repeats.
fn compose_tags(tags: &StringList) -> String {
  let mut seen = HashSet::new();
  tags
    .iter()
    .filter(|tag| !tag.is_empty() && seen.insert(tag.as_str()))
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(",")
}

/// Compose the compiler arguments for one target.
pub fn compose_args(settings: &BuildSettings, source: &str, output: &Path) -> Vec<String> {
  let mut args = vec!["build".to_string()];

  if settings.verbose {
    args.push("-v".to_string());
  }

  let tags = compose_tags(&settings.tags);
  if !tags.is_empty() {
    args.push("-tags".to_string());
    args.push(tags);
  }

  if settings.trimpath {
    args.push("-trimpath".to_string());
  }

  for (flag, value) in [
    ("-gcflags", &settings.gcflags),
    ("-asmflags", &settings.asmflags),
    ("-mod", &settings.module_mode),
  ] {
    if !value.is_empty() {
      args.push(flag.to_string());
      args.push(value.clone());
    }
  }

  if settings.race {
    args.push("-race".to_string());
  }

  let ldflags = compose_ldflags(&settings.ldflags, &settings.vars);
  if !ldflags.is_empty() {
    args.push("-ldflags".to_string());
    args.push(ldflags);
  }

  let output = output.to_string_lossy();
  if !output.is_empty() {
    args.push("-o".to_string());
    args.push(output.into_owned());
  }

  args.push(source.to_string());
  args
}

/// Quote a single word for a POSIX shell.
pub fn quote(word: &str) -> String {
  match shlex::try_quote(word) {
    Ok(quoted) => quoted.into_owned(),
    // Only NUL bytes are unquotable, and no process argument can hold one.
    Err(_) => format!("'{}'", word.replace('\0', "").replace('\'', r"'\''")),
  }
}

/// Render a command line that can be pasted into a shell.
pub fn render_command(program: &str, args: &[String]) -> String {
  std::iter::once(program)
    .chain(args.iter().map(String::as_str))
    .map(quote)
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vars(pairs: &[(&str, &str)]) -> EnvMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn ldflags_with_vars() {
    let ld = StringList::from_iter(["-s -w"]);

    assert_eq!(
      compose_ldflags(&ld, &vars(&[("main.version", "1.2.3")])),
      "-s -w -X 'main.version=1.2.3'"
    );
  }

  #[test]
  fn ldflags_keep_literal_order_and_sort_vars() {
    let ld = StringList::from_iter(["-w", "-s"]);
    let v = vars(&[("main.commit", "abc"), ("main.branch", "dev")]);

    assert_eq!(
      compose_ldflags(&ld, &v),
      "-w -s -X 'main.branch=dev' -X 'main.commit=abc'"
    );
  }

  #[test]
  fn ldflags_empty_when_nothing_set() {
    assert_eq!(compose_ldflags(&StringList::default(), &EnvMap::new()), "");
    assert_eq!(compose_ldflags(&StringList::from_iter([""]), &EnvMap::new()), "");
  }

  #[test]
  fn minimal_settings() {
    let args = compose_args(&BuildSettings::default(), ".", Path::new("builds/linux/amd64/app"));

    assert_eq!(args, vec!["build", "-o", "builds/linux/amd64/app", "."]);
  }

  #[test]
  fn full_settings_order() {
    let settings = BuildSettings {
      verbose: true,
      tags: StringList::from_iter(["netgo", "osusergo"]),
      trimpath: true,
      gcflags: "all=-N -l".to_string(),
      asmflags: "-S".to_string(),
      module_mode: "vendor".to_string(),
      race: true,
      ldflags: StringList::from_iter(["-s -w"]),
      vars: vars(&[("main.version", "1.2.3")]),
      ..Default::default()
    };

    let args = compose_args(&settings, "./cmd/app", Path::new("out/app"));

    assert_eq!(
      args,
      vec![
        "build",
        "-v",
        "-tags",
        "netgo,osusergo",
        "-trimpath",
        "-gcflags",
        "all=-N -l",
        "-asmflags",
        "-S",
        "-mod",
        "vendor",
        "-race",
        "-ldflags",
        "-s -w -X 'main.version=1.2.3'",
        "-o",
        "out/app",
        "./cmd/app",
      ]
    );
  }

  #[test]
  fn tags_are_deduplicated() {
    let settings = BuildSettings {
      tags: StringList::from_iter(["b", "a", "b", ""]),
      ..Default::default()
    };

    let args = compose_args(&settings, ".", Path::new("app"));

    assert_eq!(args[1..3], ["-tags".to_string(), "b,a".to_string()]);
  }

  #[test]
  fn debug_and_verify_add_no_flags() {
    let settings = BuildSettings {
      debug: true,
      verify_static: true,
      ..Default::default()
    };

    assert_eq!(compose_args(&settings, ".", Path::new("app")), vec!["build", "-o", "app", "."]);
  }

  #[test]
  fn composition_is_stable() {
    let settings = BuildSettings {
      tags: StringList::from_iter(["x", "y"]),
      vars: vars(&[("z.v", "1"), ("a.v", "2"), ("m.v", "3")]),
      ..Default::default()
    };

    let first = compose_args(&settings, ".", Path::new("app"));
    let second = compose_args(&settings, ".", Path::new("app"));

    assert_eq!(first, second);
  }

  #[test]
  fn render_plain_command() {
    let args = compose_args(&BuildSettings::default(), ".", Path::new("builds/linux/amd64/app"));

    assert_eq!(render_command("go", &args), "go build -o builds/linux/amd64/app .");
  }

  #[test]
  fn rendered_command_splits_back_to_args() {
    let settings = BuildSettings {
      gcflags: "all=-N -l".to_string(),
      ldflags: StringList::from_iter(["-s -w"]),
      vars: vars(&[("main.version", "1.2.3"), ("main.quote", "it's")]),
      ..Default::default()
    };
    let args = compose_args(&settings, "./cmd/my app", Path::new("out dir/app"));

    let rendered = render_command("go", &args);
    let split = shlex::split(&rendered).unwrap();

    assert_eq!(split[0], "go");
    assert_eq!(&split[1..], &args[..]);
  }
}
