//! Field declaration types
//!
//! A field map is a flat table keyed by dotted field path:
//!
//! ```json
//! {
//!   "user.name": { "type": "text", "required": true },
//!   "tags":      { "type": "keyword", "array": true, "ignore_above": 256 }
//! }
//! ```
//!
//! `required` and `array` are declaration-time metadata. Everything else is
//! an index-schema attribute and ends up in the built mapping.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flat table of field declarations keyed by dotted path.
///
/// Ordered so that iteration (and anything derived from it) is deterministic.
pub type FieldTable = BTreeMap<String, FieldDeclaration>;

/// Controls how the search engine treats fields that are not in the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicMode {
    /// Reject documents carrying unknown fields (`"strict"`)
    #[default]
    Strict,
    /// Auto-index unknown fields (`true`)
    Enabled,
    /// Keep unknown fields in the source but do not index them (`false`)
    Disabled,
}

impl DynamicMode {
    /// Returns the JSON value the search engine expects for this mode
    pub fn as_value(&self) -> Value {
        match self {
            DynamicMode::Strict => Value::String("strict".into()),
            DynamicMode::Enabled => Value::Bool(true),
            DynamicMode::Disabled => Value::Bool(false),
        }
    }

    /// Returns the textual form used in logs and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DynamicMode::Strict => "strict",
            DynamicMode::Enabled => "true",
            DynamicMode::Disabled => "false",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, DynamicMode::Strict)
    }
}

impl fmt::Display for DynamicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DynamicMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(DynamicMode::Strict),
            "true" => Ok(DynamicMode::Enabled),
            "false" => Ok(DynamicMode::Disabled),
            other => Err(format!(
                "invalid dynamic mode '{}': expected 'strict', 'true' or 'false'",
                other
            )),
        }
    }
}

impl Serialize for DynamicMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DynamicMode::Strict => serializer.serialize_str("strict"),
            DynamicMode::Enabled => serializer.serialize_bool(true),
            DynamicMode::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for DynamicMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(DynamicMode::Enabled),
            Raw::Flag(false) => Ok(DynamicMode::Disabled),
            Raw::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Dotted path; when present it must equal the table key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Index field type (`keyword`, `text`, `date`, `object`, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether documents must carry a non-null value for this field
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Whether the field holds an array of values
    #[serde(default, skip_serializing_if = "is_false")]
    pub array: bool,
    /// Remaining index-schema attributes, passed through untouched
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldDeclaration {
    /// Create an optional, single-valued field of the given type
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            name: None,
            field_type: field_type.into(),
            required: false,
            array: false,
            attributes: Map::new(),
        }
    }

    pub fn keyword() -> Self {
        Self::new("keyword")
    }

    pub fn text() -> Self {
        Self::new("text")
    }

    pub fn object() -> Self {
        Self::new("object")
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as array-valued
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Attach the dotted path as an explicit `name`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an extra index-schema attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the declared type can hold sub-properties in a mapping
    pub fn is_container(&self) -> bool {
        is_container_type(&self.field_type)
    }

    /// Returns the attributes that belong in the index mapping.
    ///
    /// `name`, `required` and `array` are dropped; `type` and every extra
    /// attribute are kept.
    pub fn schema_attributes(&self) -> Map<String, Value> {
        let mut attributes = self.attributes.clone();
        attributes.insert("type".into(), Value::String(self.field_type.clone()));
        attributes
    }
}

/// Types that may carry `properties` in an index mapping.
pub fn is_container_type(field_type: &str) -> bool {
    matches!(field_type, "object" | "nested")
}

/// A persisted, identified field table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    /// Unique field map identifier
    pub field_map_id: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Dynamic mode for the built mapping; registry default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicMode>,
    /// Field declarations
    pub fields: FieldTable,
}

impl FieldMap {
    /// Create a new field map with no explicit dynamic mode
    pub fn new(field_map_id: impl Into<String>, fields: FieldTable) -> Self {
        Self {
            field_map_id: field_map_id.into(),
            description: None,
            dynamic: None,
            fields,
        }
    }

    pub fn with_dynamic(mut self, dynamic: DynamicMode) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the declared dynamic mode, or `fallback` when none is declared
    pub fn dynamic_or(&self, fallback: DynamicMode) -> DynamicMode {
        self.dynamic.unwrap_or(fallback)
    }
}
