//! Component manifest model for developer-container images.
//!
//! This crate defines the schema layer: JSON manifest parsing
//! (`ComponentManifest`), installable product entries (`Product`), the
//! canonical serialization used to hand a validated manifest to build-file
//! generation, and the derived classification queries (`is_base`,
//! `is_install_component`, `is_heavyweight`).

pub mod manifest;
pub mod product;
pub mod types;

pub use manifest::{
    parse_manifest_file, parse_manifest_str, ComponentManifest, ErrorKind, ManifestError,
    HEAVYWEIGHT_THRESHOLD, IMAGE_TAG_SEPARATOR,
};
pub use product::{Product, ProductError};
pub use types::{ComponentType, ProductId};

pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
