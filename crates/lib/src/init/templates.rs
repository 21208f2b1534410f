//! Template content for `gobuilder init`.

/// Sample configuration written by `gobuilder init`.
pub const CONFIG_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/gobuilder.yml"));
