//! Schema error types
//!
//! Error codes:
//! - STORE_SCHEMA_INVALID (REJECT)
//! - STORE_CONSTRAINT_VIOLATION (REJECT)
//! - STORE_CONFIGURATION_ERROR (FATAL)
//! - STORE_MALFORMED_RECORD (FATAL)
//! - STORE_UNKNOWN_FIELD (REJECT)

use std::fmt;

use serde_json::Value;

use crate::value::kind_name;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected, data may be corrected and retried
    Reject,
    /// Misconfiguration or corrupt stored data, retrying cannot help
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field declaration or schema structure is invalid
    StoreSchemaInvalid,
    /// A value breaks a REQUIRED/UNIQUE constraint, or an id is missing
    StoreConstraintViolation,
    /// Operation used against a field that does not support it
    StoreConfigurationError,
    /// A stored record cannot be turned back into an entity
    StoreMalformedRecord,
    /// Value supplied for a field the schema does not declare
    StoreUnknownField,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::StoreSchemaInvalid => "STORE_SCHEMA_INVALID",
            SchemaErrorCode::StoreConstraintViolation => "STORE_CONSTRAINT_VIOLATION",
            SchemaErrorCode::StoreConfigurationError => "STORE_CONFIGURATION_ERROR",
            SchemaErrorCode::StoreMalformedRecord => "STORE_MALFORMED_RECORD",
            SchemaErrorCode::StoreUnknownField => "STORE_UNKNOWN_FIELD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::StoreConfigurationError | SchemaErrorCode::StoreMalformedRecord => {
                Severity::Fatal
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    field: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, field: Option<String>) -> Self {
        Self {
            code,
            message,
            field,
        }
    }

    /// OPTIONAL field declared without a default
    pub fn optional_without_default(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreSchemaInvalid,
            format!("Optional field '{}' must declare a non-null default", field),
            Some(field),
        )
    }

    /// Two declarations share a name
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreSchemaInvalid,
            format!("Field '{}' is declared more than once", field),
            Some(field),
        )
    }

    /// A declaration uses the reserved record key
    pub fn reserved_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreSchemaInvalid,
            format!("Field name '{}' is reserved for the record id", field),
            Some(field),
        )
    }

    /// Mandatory field holds null
    pub fn null_value(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreConstraintViolation,
            format!("Field '{}' requires a non-null value", field),
            Some(field),
        )
    }

    /// Unique field already holds this value for another entity
    pub fn duplicate_value(field: impl Into<String>, value: &Value) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreConstraintViolation,
            format!("Field '{}' must be unique, value {} already exists", field, value),
            Some(field),
        )
    }

    /// Entity reached a write without an id
    pub fn missing_id() -> Self {
        Self::new(
            SchemaErrorCode::StoreConstraintViolation,
            "Entity must have an id".into(),
            None,
        )
    }

    /// Entity-wide validation failed; messages are joined
    pub fn validation_failed(errors: &[String]) -> Self {
        Self::new(
            SchemaErrorCode::StoreConstraintViolation,
            format!("Entity validation failed: {}", errors.join("; ")),
            None,
        )
    }

    /// Unique lookup against a field that is not unique
    pub fn not_unique(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreConfigurationError,
            format!("Field '{}' is not declared unique", field),
            Some(field),
        )
    }

    /// Value supplied for an undeclared field
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::StoreUnknownField,
            format!("Field '{}' is not declared in the schema", field),
            Some(field),
        )
    }

    /// Record has no `id` key
    pub fn record_missing_id() -> Self {
        Self::new(
            SchemaErrorCode::StoreMalformedRecord,
            "Record has no 'id' key".into(),
            None,
        )
    }

    /// Record `id` is neither an integer nor a string
    pub fn record_invalid_id(value: &Value) -> Self {
        Self::new(
            SchemaErrorCode::StoreMalformedRecord,
            format!("Record id must be an int or a string, got {}", kind_name(value)),
            None,
        )
    }

    /// Caller values or record are not a JSON object
    pub fn not_an_object(value: &Value) -> Self {
        Self::new(
            SchemaErrorCode::StoreMalformedRecord,
            format!("Expected an object, got {}", kind_name(value)),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        self.code == SchemaErrorCode::StoreConstraintViolation
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
