//! A field value bound to its declaration

use serde_json::Value;

use crate::schema::{FieldBase, FieldKeyType, FieldType, SchemaError, SchemaResult};

/// One value of an entity together with the declaration it was bound to.
///
/// Construction substitutes the declared default for a null value and
/// rejects a remaining null on mandatory fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityField {
    base: FieldBase,
    value: Value,
}

impl EntityField {
    /// Binds a value to a declaration.
    ///
    /// # Errors
    ///
    /// Returns `STORE_CONSTRAINT_VIOLATION` if the field is mandatory and
    /// the value is null with no default to fall back to.
    pub fn new(base: &FieldBase, value: Value) -> SchemaResult<Self> {
        let field = Self::bind(base, value);
        if field.key_type().is_mandatory() && field.value.is_null() {
            return Err(SchemaError::null_value(base.name()));
        }
        Ok(field)
    }

    /// Binds without the mandatory check. Defaults still apply.
    pub(crate) fn bind(base: &FieldBase, value: Value) -> Self {
        let value = match (value, base.default_value()) {
            (Value::Null, Some(default)) => default.clone(),
            (value, _) => value,
        };
        Self {
            base: base.clone(),
            value,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Type tag
    pub fn field_type(&self) -> FieldType {
        self.base.field_type()
    }

    /// Constraint kind
    pub fn key_type(&self) -> FieldKeyType {
        self.base.key_type()
    }

    /// Declared default
    pub fn default_value(&self) -> Option<&Value> {
        self.base.default_value()
    }

    /// The declaration this value is bound to
    pub fn base(&self) -> &FieldBase {
        &self.base
    }

    /// Current value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Consumes the field, returning its value
    pub fn into_value(self) -> Value {
        self.value
    }
}
