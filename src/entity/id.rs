//! Entity identifiers
//!
//! Ids are integers (sequential policy) or strings (random and UUID
//! policies). They serialize untagged, so a record stores `1` or `"abc"`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{SchemaError, SchemaResult};

/// Identifier of a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Sequential integer id
    Int(i64),
    /// Random string or UUID id
    Str(String),
}

impl EntityId {
    /// Reads an id from a record value.
    ///
    /// # Errors
    ///
    /// Returns `STORE_MALFORMED_RECORD` for anything but an integer or a string.
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(EntityId::Int)
                .ok_or_else(|| SchemaError::record_invalid_id(value)),
            Value::String(s) => Ok(EntityId::Str(s.clone())),
            _ => Err(SchemaError::record_invalid_id(value)),
        }
    }

    /// Record representation
    pub fn to_value(&self) -> Value {
        match self {
            EntityId::Int(n) => Value::from(*n),
            EntityId::Str(s) => Value::String(s.clone()),
        }
    }

    /// Integer value, if this is a sequential id
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EntityId::Int(n) => Some(*n),
            EntityId::Str(_) => None,
        }
    }

    /// Whether a record value denotes this id
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (EntityId::Int(n), Value::Number(v)) => v.as_i64() == Some(*n),
            (EntityId::Str(s), Value::String(v)) => s == v,
            _ => false,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Int(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        EntityId::Int(i64::from(n))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Str(s)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId::Str(id.to_string())
    }
}
