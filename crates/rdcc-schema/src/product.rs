use crate::types::ProductId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product entry must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("invalid value for '{field}': {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// An installable item (package, feature, ...) listed in a component manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    kind: String,
}

impl Product {
    /// Build a product from one decoded `products` entry.
    pub fn from_value(value: &Value) -> Result<Self, ProductError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ProductError::NotAnObject(crate::value_kind(other))),
        }
    }

    /// Build a product from a key-value map holding `id` and `type`.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ProductError> {
        Ok(Self {
            id: required(map, "id")?,
            kind: required(map, "type")?,
        })
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Free-form product classification, serialized as `type`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert("id".to_owned(), Value::String(self.id.to_string()));
        map.insert("type".to_owned(), Value::String(self.kind.clone()));
        Value::Object(map)
    }
}

fn required<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<T, ProductError> {
    let value = map.get(field).ok_or(ProductError::MissingField(field))?;
    T::deserialize(value).map_err(|source| ProductError::InvalidField { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_product_entry() {
        let product = Product::from_value(&json!({"id": "git", "type": "package"})).unwrap();
        assert_eq!(product.id(), &ProductId::new("git"));
        assert_eq!(product.kind(), "package");
    }

    #[test]
    fn ignores_extra_keys() {
        let product =
            Product::from_value(&json!({"id": "git", "type": "package", "note": 1})).unwrap();
        assert_eq!(product.kind(), "package");
    }

    #[test]
    fn accepts_empty_strings() {
        let product = Product::from_value(&json!({"id": "", "type": ""})).unwrap();
        assert_eq!(product.id().as_str(), "");
        assert_eq!(product.kind(), "");
        assert_eq!(product.to_value(), json!({"id": "", "type": ""}));
    }

    #[test]
    fn rejects_missing_id() {
        let err = Product::from_value(&json!({"type": "feature"})).unwrap_err();
        assert!(matches!(err, ProductError::MissingField("id")));
    }

    #[test]
    fn rejects_missing_type() {
        let err = Product::from_value(&json!({"id": "node"})).unwrap_err();
        assert!(matches!(err, ProductError::MissingField("type")));
        assert_eq!(err.to_string(), "missing required field 'type'");
    }

    #[test]
    fn does_not_coerce_values() {
        let err = Product::from_value(&json!({"id": 7, "type": "package"})).unwrap_err();
        assert!(matches!(err, ProductError::InvalidField { field: "id", .. }));
    }

    #[test]
    fn rejects_non_object_entry() {
        let err = Product::from_value(&json!("git")).unwrap_err();
        assert!(matches!(err, ProductError::NotAnObject("string")));
    }

    #[test]
    fn serializes_as_two_key_map() {
        let product = Product::from_value(&json!({"id": "git", "type": "package"})).unwrap();
        assert_eq!(product.to_value(), json!({"id": "git", "type": "package"}));
    }
}
