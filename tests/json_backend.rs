//! JSON Store Tests
//!
//! Tests for tables persisted as JSON files:
//! - File layout is `{"content": [...]}`
//! - Reopening rebuilds the unique index from disk
//! - Damaged files are reported, not silently accepted

use std::fs;

use recordstore::backend::{BackendError, JsonFileBackend, RecordBackend};
use recordstore::schema::{FieldBase, FieldType, SchemaErrorCode};
use recordstore::{DataTable, Entity, EntityId, JsonTable, TableError};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn schema() -> Vec<FieldBase> {
    vec![
        FieldBase::unique("email", FieldType::Str),
        FieldBase::required("name", FieldType::Str),
    ]
}

fn user(id: i64, email: &str, name: &str) -> Entity {
    let mut entity = Entity::from_json(&schema(), &json!({"email": email, "name": name})).unwrap();
    entity.set_id(id);
    entity
}

fn read_file(tmp: &TempDir, table: &str) -> Value {
    let raw = fs::read_to_string(tmp.path().join(format!("{}.json", table))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Layout Tests
// =============================================================================

/// Writes land in the content list in insertion order.
#[test]
fn test_file_layout() {
    let tmp = TempDir::new().unwrap();
    let mut table = JsonTable::open_json("users", tmp.path(), schema(), true).unwrap();
    assert_eq!(read_file(&tmp, "users"), json!({"content": []}));

    table.insert(user(1, "a@x.io", "Ann")).unwrap();
    table.insert(user(2, "b@x.io", "Bob")).unwrap();
    assert_eq!(
        read_file(&tmp, "users"),
        json!({"content": [
            {"id": 1, "email": "a@x.io", "name": "Ann"},
            {"id": 2, "email": "b@x.io", "name": "Bob"}
        ]})
    );

    table.delete(&EntityId::Int(1)).unwrap();
    assert_eq!(read_file(&tmp, "users")["content"].as_array().unwrap().len(), 1);

    table.clear().unwrap();
    assert_eq!(read_file(&tmp, "users"), json!({"content": []}));
    assert!(!tmp.path().join("users.json.tmp").exists());
}

/// Opening without create fails on a missing file.
#[test]
fn test_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap_err();
    assert!(matches!(err, TableError::Backend(BackendError::MissingFile(_))));

    let nested = tmp.path().join("a").join("b");
    JsonTable::open_json("users", &nested, schema(), true).unwrap();
    assert!(nested.join("users.json").exists());
}

/// A file without a content list is initialized.
#[test]
fn test_file_without_content_initialized() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("users.json"), "{}").unwrap();

    let table = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap();
    assert_eq!(table.count().unwrap(), 0);
    assert_eq!(read_file(&tmp, "users"), json!({"content": []}));
}

// =============================================================================
// Reopen Tests
// =============================================================================

/// The unique index is rebuilt from disk on reopen.
#[test]
fn test_reopen_rebuilds_unique_index() {
    let tmp = TempDir::new().unwrap();
    {
        let mut table = JsonTable::open_json("users", tmp.path(), schema(), true).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
    }

    let mut table = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap();
    let found = table.get_unique("email", &json!("a@x.io")).unwrap().unwrap();
    assert_eq!(found.get_value("name"), Some(&json!("Ann")));

    let err = table.insert(user(2, "a@x.io", "Imposter")).unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(table.count().unwrap(), 1);
}

/// Out-of-band edits become visible after refresh_fields.
#[test]
fn test_refresh_after_external_edit() {
    let tmp = TempDir::new().unwrap();
    let mut table = JsonTable::open_json("users", tmp.path(), schema(), true).unwrap();
    table.insert(user(1, "a@x.io", "Ann")).unwrap();

    let mut other = JsonFileBackend::open(tmp.path(), "users", false).unwrap();
    let mut records = other.load().unwrap();
    records[0].insert("email".into(), json!("changed@x.io"));
    other.store(records).unwrap();

    assert_eq!(table.refresh_fields().unwrap(), 1);
    assert!(table.get_unique("email", &json!("a@x.io")).unwrap().is_none());
    assert!(table.get_unique("email", &json!("changed@x.io")).unwrap().is_some());
}

// =============================================================================
// Damaged File Tests
// =============================================================================

/// Stored records breaking a constraint fail the open.
#[test]
fn test_stored_duplicate_rejected_on_open() {
    let tmp = TempDir::new().unwrap();
    let content = json!({"content": [
        {"id": 1, "email": "a@x.io", "name": "Ann"},
        {"id": 2, "email": "a@x.io", "name": "Bob"}
    ]});
    fs::write(tmp.path().join("users.json"), content.to_string()).unwrap();

    let err = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap_err();
    assert!(err.is_constraint_violation());
}

/// Stored records sharing an id fail the open.
#[test]
fn test_stored_duplicate_id_rejected_on_open() {
    let tmp = TempDir::new().unwrap();
    let content = json!({"content": [
        {"id": 1, "email": "a@x.io", "name": "Ann"},
        {"id": 1, "email": "b@x.io", "name": "Bob"}
    ]});
    fs::write(tmp.path().join("users.json"), content.to_string()).unwrap();

    let err = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap_err();
    assert!(err.is_duplicate_entity());
}

/// A stored record without an id is malformed.
#[test]
fn test_record_without_id_malformed() {
    let tmp = TempDir::new().unwrap();
    let content = json!({"content": [{"email": "a@x.io", "name": "Ann"}]});
    fs::write(tmp.path().join("users.json"), content.to_string()).unwrap();

    let err = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap_err();
    assert_eq!(err.schema_code(), Some(SchemaErrorCode::StoreMalformedRecord));
}

/// Content that is not a list of objects is reported as malformed.
#[test]
fn test_malformed_content() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("users.json"), r#"{"content": [1, 2]}"#).unwrap();

    let err = JsonTable::open_json("users", tmp.path(), schema(), false).unwrap_err();
    assert!(matches!(err, TableError::Backend(BackendError::Malformed { .. })));
}
