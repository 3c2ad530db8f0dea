use crate::product::{Product, ProductError};
use crate::types::ComponentType;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Separator between image name and version in a full image reference.
pub const IMAGE_TAG_SEPARATOR: char = ':';

/// `heavyweight` values at or above this mark a component as heavyweight.
pub const HEAVYWEIGHT_THRESHOLD: u64 = 1;

/// Coarse failure categories callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    MalformedInput,
    MissingField,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse manifest: root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("manifest error: missing required field '{0}'")]
    MissingField(&'static str),
    #[error("manifest error: invalid value for '{field}': {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("manifest error: products[{index}]: {source}")]
    Product {
        index: usize,
        #[source]
        source: ProductError,
    },
}

impl ManifestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::FileNotFound,
            Self::MissingField(_)
            | Self::Product {
                source: ProductError::MissingField(_),
                ..
            } => ErrorKind::MissingField,
            Self::ParseJson(_)
            | Self::NotAnObject(_)
            | Self::InvalidField { .. }
            | Self::Product { .. } => ErrorKind::MalformedInput,
        }
    }

    /// Name of the absent key for `MissingField`-kind errors.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field)
            | Self::Product {
                source: ProductError::MissingField(field),
                ..
            } => Some(*field),
            _ => None,
        }
    }

    /// Position of the offending entry when the failure is inside `products`.
    pub fn product_index(&self) -> Option<usize> {
        match self {
            Self::Product { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One developer-container component: image identity, supported
/// architectures, dependencies and installable products.
///
/// Instances only exist fully validated. Optional fields keep their
/// presence exactly as read: `None` is "not specified", `Some(vec![])` is
/// "specified as none".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentManifest {
    image_name: String,
    kind: ComponentType,
    image_version: String,
    arch: Vec<String>,
    products: Option<Vec<Product>>,
    depends_on: Option<Vec<String>>,
    heavyweight: Option<Number>,
}

impl ComponentManifest {
    /// Build a manifest from any decoded JSON value; the root must be an object.
    pub fn from_value(value: &Value) -> Result<Self, ManifestError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ManifestError::NotAnObject(crate::value_kind(other))),
        }
    }

    /// Build a manifest from a decoded key-value map.
    ///
    /// Unknown keys are ignored. An explicit `null` for an optional key reads
    /// as absent.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ManifestError> {
        let image_name = required(map, "image_name")?;
        let kind = required(map, "type")?;
        let image_version = required(map, "image_version")?;
        let arch = required(map, "arch")?;

        let products = optional::<Vec<Value>>(map, "products")?
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        Product::from_value(entry)
                            .map_err(|source| ManifestError::Product { index, source })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            image_name,
            kind,
            image_version,
            arch,
            products,
            depends_on: optional(map, "depends_on")?,
            heavyweight: optional_integer(map, "heavyweight")?,
        })
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// The manifest's `type` field.
    pub fn kind(&self) -> &ComponentType {
        &self.kind
    }

    pub fn image_version(&self) -> &str {
        &self.image_version
    }

    pub fn arch(&self) -> &[String] {
        &self.arch
    }

    pub fn products(&self) -> Option<&[Product]> {
        self.products.as_deref()
    }

    pub fn depends_on(&self) -> Option<&[String]> {
        self.depends_on.as_deref()
    }

    /// The `heavyweight` marker; any JSON integer, signed or unsigned.
    pub fn heavyweight(&self) -> Option<&Number> {
        self.heavyweight.as_ref()
    }

    /// `image_name:image_version`.
    pub fn full_image_reference(&self) -> String {
        format!(
            "{}{IMAGE_TAG_SEPARATOR}{}",
            self.image_name, self.image_version
        )
    }

    pub fn is_base(&self) -> bool {
        self.kind.is_base()
    }

    pub fn is_install_component(&self) -> bool {
        self.kind.is_install_component()
    }

    pub fn is_heavyweight(&self) -> bool {
        self.heavyweight
            .as_ref()
            .and_then(Number::as_u64)
            .is_some_and(|weight| weight >= HEAVYWEIGHT_THRESHOLD)
    }

    /// Serialize back to a key-value map, the inverse of [`Self::from_map`].
    ///
    /// Absent optional fields are omitted, never written as `null`. Keys come
    /// out in schema order.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "image_name".to_owned(),
            Value::String(self.image_name.clone()),
        );
        map.insert("type".to_owned(), Value::String(self.kind.to_string()));
        map.insert(
            "image_version".to_owned(),
            Value::String(self.image_version.clone()),
        );
        map.insert("arch".to_owned(), string_array(&self.arch));
        if let Some(products) = &self.products {
            map.insert(
                "products".to_owned(),
                Value::Array(products.iter().map(Product::to_value).collect()),
            );
        }
        if let Some(depends_on) = &self.depends_on {
            map.insert("depends_on".to_owned(), string_array(depends_on));
        }
        if let Some(heavyweight) = &self.heavyweight {
            map.insert("heavyweight".to_owned(), Value::Number(heavyweight.clone()));
        }
        map
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Render [`Self::to_map`] as pretty JSON indented by `indent` spaces.
    pub fn to_json(&self, indent: usize) -> Result<String, serde_json::Error> {
        let pad = " ".repeat(indent);
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(pad.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.to_map().serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

impl std::str::FromStr for ComponentManifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_manifest_str(s)
    }
}

pub fn parse_manifest_str(input: &str) -> Result<ComponentManifest, ManifestError> {
    let value: Value = serde_json::from_str(input)?;
    ComponentManifest::from_value(&value)
}

/// Read and validate a manifest file. The file handle is dropped before
/// validation starts.
pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<ComponentManifest, ManifestError> {
    let path = path.as_ref();
    let value: Value = {
        let file = File::open(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source: e.into(),
                }
            } else {
                ManifestError::ParseJson(e)
            }
        })?
    };
    ComponentManifest::from_value(&value)
}

fn required<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<T, ManifestError> {
    let value = map.get(field).ok_or(ManifestError::MissingField(field))?;
    T::deserialize(value).map_err(|source| ManifestError::InvalidField { field, source })
}

fn optional<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, ManifestError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|source| ManifestError::InvalidField { field, source }),
    }
}

fn optional_integer(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Number>, ManifestError> {
    let Some(number) = optional::<Number>(map, field)? else {
        return Ok(None);
    };
    if number.is_f64() {
        return Err(ManifestError::InvalidField {
            field,
            source: serde::de::Error::custom(format!("expected an integer, found {number}")),
        });
    }
    Ok(Some(number))
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
