//! Field schema subsystem
//!
//! A schema is an ordered list of [`FieldBase`] declarations. Each field
//! carries a name, a descriptive type tag, a constraint kind and an
//! optional default.
//!
//! # Design Principles
//!
//! - Declarations are immutable once built
//! - OPTIONAL fields always have a default
//! - Type tags are descriptive, values are never coerced
//! - Violations are returned, never panicked

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use types::{FieldBase, FieldKeyType, FieldType};
pub use validator::{find_field, validate_structure, ID_KEY};
