//! Lenient deserializers for YAML scalars.
//!
//! YAML happily types `CGO_ENABLED: 0` as an integer and `arch: 386` as a
//! number. Everything the compiler sees is text, so these helpers accept any
//! scalar and render it as a string.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

use crate::env::EnvMap;

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Sequence(_) => "sequence",
    Value::Mapping(_) => "mapping",
    Value::Tagged(_) => "tagged value",
  }
}

fn scalar_to_string<E: Error>(value: Value) -> Result<String, E> {
  match value {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    Value::Bool(b) => Ok(b.to_string()),
    Value::Null => Ok(String::new()),
    other => Err(E::custom(format!("expected a scalar, found {}", kind(&other)))),
  }
}

/// Deserialize any YAML scalar into a string. `null` becomes the empty string.
pub fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  scalar_to_string(Value::deserialize(deserializer)?)
}

/// Deserialize a mapping of scalars into an [`EnvMap`]. `null` becomes an empty map.
pub fn scalar_map<'de, D>(deserializer: D) -> Result<EnvMap, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(mapping) = Option::<Mapping>::deserialize(deserializer)? else {
    return Ok(EnvMap::new());
  };

  let mut out = EnvMap::new();
  for (key, value) in mapping {
    let key: String = scalar_to_string(key)?;
    let value: String = scalar_to_string(value)?;
    out.insert(key, value);
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Deserialize)]
  struct Holder {
    #[serde(default, deserialize_with = "scalar_string")]
    name: String,
    #[serde(default, deserialize_with = "scalar_map")]
    vars: EnvMap,
  }

  #[test]
  fn numbers_and_bools_become_strings() {
    let holder: Holder = serde_yaml::from_str("name: 386\nvars:\n  CGO_ENABLED: 0\n  DEBUG: true\n  RATIO: 1.5\n").unwrap();

    assert_eq!(holder.name, "386");
    assert_eq!(holder.vars["CGO_ENABLED"], "0");
    assert_eq!(holder.vars["DEBUG"], "true");
    assert_eq!(holder.vars["RATIO"], "1.5");
  }

  #[test]
  fn null_values_are_empty() {
    let holder: Holder = serde_yaml::from_str("name:\nvars:\n").unwrap();

    assert_eq!(holder.name, "");
    assert!(holder.vars.is_empty());
  }

  #[test]
  fn nested_values_are_rejected() {
    let err = serde_yaml::from_str::<Holder>("vars:\n  A: [1, 2]\n").unwrap_err();

    assert!(err.to_string().contains("expected a scalar, found sequence"));
  }
}
