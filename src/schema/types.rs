//! Field schema type definitions
//!
//! Key types are ordered by how mandatory they are:
//! PRIMARY < UNIQUE < REQUIRED < STANDARD < OPTIONAL.
//! Anything ranked before STANDARD must always hold a value.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};

/// Semantic type tag of a field.
///
/// Descriptive only: values are never checked or coerced against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    /// Integer
    Int,
    /// String
    Str,
    /// UUID carried as a string
    Uuid,
    /// Boolean
    Bool,
    /// Floating point
    Float,
    /// List of values
    List,
    /// Nested mapping
    Dict,
}

impl FieldType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "INT",
            FieldType::Str => "STR",
            FieldType::Uuid => "UUID",
            FieldType::Bool => "BOOL",
            FieldType::Float => "FLOAT",
            FieldType::List => "LIST",
            FieldType::Dict => "DICT",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Constraint kind of a field, declared from most to least mandatory.
///
/// The derived ordering follows declaration order and matches [`rank`](Self::rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKeyType {
    /// Primary key, implies unique and mandatory
    Primary,
    /// Unique and mandatory
    Unique,
    /// Mandatory
    Required,
    /// May be null
    Standard,
    /// May be omitted, falls back to its declared default
    Optional,
}

impl FieldKeyType {
    /// Position in the mandatoriness order, 0 being the strictest
    pub fn rank(&self) -> u8 {
        match self {
            FieldKeyType::Primary => 0,
            FieldKeyType::Unique => 1,
            FieldKeyType::Required => 2,
            FieldKeyType::Standard => 3,
            FieldKeyType::Optional => 4,
        }
    }

    /// Ranks stricter than STANDARD: a null value is never acceptable
    pub fn is_mandatory(&self) -> bool {
        self.rank() < FieldKeyType::Standard.rank()
    }

    /// No two live entities may share a value
    pub fn is_unique(&self) -> bool {
        matches!(self, FieldKeyType::Primary | FieldKeyType::Unique)
    }

    /// Returns the key type name for messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKeyType::Primary => "PRIMARY",
            FieldKeyType::Unique => "UNIQUE",
            FieldKeyType::Required => "REQUIRED",
            FieldKeyType::Standard => "STANDARD",
            FieldKeyType::Optional => "OPTIONAL",
        }
    }
}

impl fmt::Display for FieldKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static declaration of one field of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBase {
    name: String,
    field_type: FieldType,
    key_type: FieldKeyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl FieldBase {
    /// Declares a field.
    ///
    /// A `Some(Value::Null)` default is treated as no default.
    ///
    /// # Errors
    ///
    /// Returns `STORE_SCHEMA_INVALID` if `key_type` is OPTIONAL and no
    /// default is given.
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        key_type: FieldKeyType,
        default: Option<Value>,
    ) -> SchemaResult<Self> {
        let name = name.into();
        let default = default.filter(|v| !v.is_null());
        if key_type == FieldKeyType::Optional && default.is_none() {
            return Err(SchemaError::optional_without_default(name));
        }
        Ok(Self {
            name,
            field_type,
            key_type,
            default,
        })
    }

    fn declared(name: impl Into<String>, field_type: FieldType, key_type: FieldKeyType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key_type,
            default: None,
        }
    }

    /// Primary key field
    pub fn primary(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::declared(name, field_type, FieldKeyType::Primary)
    }

    /// Unique field
    pub fn unique(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::declared(name, field_type, FieldKeyType::Unique)
    }

    /// Required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::declared(name, field_type, FieldKeyType::Required)
    }

    /// Nullable field
    pub fn standard(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::declared(name, field_type, FieldKeyType::Standard)
    }

    /// Optional field with its fallback value
    pub fn optional(
        name: impl Into<String>,
        field_type: FieldType,
        default: impl Into<Value>,
    ) -> SchemaResult<Self> {
        Self::new(name, field_type, FieldKeyType::Optional, Some(default.into()))
    }

    /// Replaces the default value.
    ///
    /// A null default on an OPTIONAL field is ignored, the field keeps its
    /// existing default.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        let default = default.into();
        if !default.is_null() {
            self.default = Some(default);
        } else if self.key_type != FieldKeyType::Optional {
            self.default = None;
        }
        self
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Constraint kind
    pub fn key_type(&self) -> FieldKeyType {
        self.key_type
    }

    /// Declared default, if any
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

#[derive(Deserialize)]
struct RawFieldBase {
    name: String,
    field_type: FieldType,
    key_type: FieldKeyType,
    #[serde(default)]
    default: Option<Value>,
}

// Deserialization goes through `new` so a stored schema cannot smuggle in an
// OPTIONAL field without a default.
impl<'de> Deserialize<'de> for FieldBase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawFieldBase::deserialize(deserializer)?;
        FieldBase::new(raw.name, raw.field_type, raw.key_type, raw.default)
            .map_err(serde::de::Error::custom)
    }
}
