//! Structural validation of a field list
//!
//! Checked once when a table is opened:
//! - Field names are unique
//! - No field uses the reserved record key `id`

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::types::FieldBase;

/// Record key reserved for the entity id.
pub const ID_KEY: &str = "id";

/// Validates a field structure.
///
/// # Errors
///
/// Returns `STORE_SCHEMA_INVALID` on the first duplicate or reserved name.
pub fn validate_structure(fields: &[FieldBase]) -> SchemaResult<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.name() == ID_KEY {
            return Err(SchemaError::reserved_field(field.name()));
        }
        if !seen.insert(field.name()) {
            return Err(SchemaError::duplicate_field(field.name()));
        }
    }
    Ok(())
}

/// Finds a declaration by name.
pub fn find_field<'a>(fields: &'a [FieldBase], name: &str) -> Option<&'a FieldBase> {
    fields.iter().find(|f| f.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_valid_structure() {
        let fields = vec![
            FieldBase::unique("email", FieldType::Str),
            FieldBase::standard("name", FieldType::Str),
        ];
        assert!(validate_structure(&fields).is_ok());
        assert!(validate_structure(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let fields = vec![
            FieldBase::standard("name", FieldType::Str),
            FieldBase::required("name", FieldType::Str),
        ];
        let err = validate_structure(&fields).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_reserved_id_rejected() {
        let fields = vec![FieldBase::primary("id", FieldType::Int)];
        let err = validate_structure(&fields).unwrap_err();
        assert!(err.message().contains("reserved"));
    }

    #[test]
    fn test_find_field() {
        let fields = vec![FieldBase::standard("name", FieldType::Str)];
        assert!(find_field(&fields, "name").is_some());
        assert!(find_field(&fields, "age").is_none());
    }
}
