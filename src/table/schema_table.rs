//! Schema-driven table over a record backend
//!
//! The backend is the source of truth. The per-field index is rebuilt from
//! a full backend scan on open and on [`Table::refresh_fields`], and kept in
//! step with every write.
//!
//! Writes check every constraint before the backend is touched, so a
//! rejected insert or update changes nothing.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use super::contract::DataTable;
use super::errors::{TableError, TableResult};
use crate::backend::{record_has_id, JsonFileBackend, MemoryBackend, RecordBackend};
use crate::entity::{Entity, EntityId};
use crate::index::TableField;
use crate::observability::{log_event, Event};
use crate::schema::{validate_structure, FieldBase, SchemaError, SchemaResult};

/// Table stored in memory
pub type MemoryTable = Table<MemoryBackend>;

/// Table stored in a JSON file
pub type JsonTable = Table<JsonFileBackend>;

/// A named table with a fixed field structure.
#[derive(Debug)]
pub struct Table<B: RecordBackend> {
    name: String,
    field_structure: Vec<FieldBase>,
    fields: Vec<TableField>,
    backend: B,
}

impl<B: RecordBackend> Table<B> {
    /// Opens a table over `backend` and builds its index from the stored
    /// records.
    ///
    /// # Errors
    ///
    /// - `STORE_SCHEMA_INVALID` for duplicate or reserved field names
    /// - Any stored record that is malformed or breaks a constraint
    /// - `DuplicateEntity` if two stored records share an id
    /// - Backend read errors
    pub fn open(
        name: impl Into<String>,
        field_structure: Vec<FieldBase>,
        backend: B,
    ) -> TableResult<Self> {
        validate_structure(&field_structure)?;
        let fields = field_structure.iter().cloned().map(TableField::new).collect();
        let mut table = Self {
            name: name.into(),
            field_structure,
            fields,
            backend,
        };
        let rows = table.refresh_fields()?;
        log_event(
            Event::TableOpened,
            &table.name,
            &format!("fields={} rows={}", table.field_structure.len(), rows),
        );
        Ok(table)
    }

    /// Rebuilds the field index from a full backend scan.
    ///
    /// The current index is kept if the rebuild fails. Returns the number
    /// of records scanned.
    pub fn refresh_fields(&mut self) -> TableResult<usize> {
        let mut fields: Vec<TableField> = self
            .field_structure
            .iter()
            .cloned()
            .map(TableField::new)
            .collect();
        let mut seen = BTreeSet::new();

        let records = self.backend.load()?;
        for record in &records {
            let entity = Entity::from_record(&self.field_structure, record)?;
            let id = entity.id().cloned().ok_or_else(SchemaError::missing_id)?;
            if !seen.insert(id.clone()) {
                return Err(TableError::DuplicateEntity(id));
            }
            index_entity(&mut fields, &id, &entity)?;
        }

        self.fields = fields;
        log_event(
            Event::IndexRefreshed,
            &self.name,
            &format!("rows={}", records.len()),
        );
        Ok(records.len())
    }

    /// Index state of one field
    pub fn table_field(&self, name: &str) -> Option<&TableField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn contains(&self, id: &EntityId) -> TableResult<bool> {
        Ok(self.backend.load()?.iter().any(|r| record_has_id(r, id)))
    }

    /// Re-binds `entity` to this table's schema under `id` and validates it.
    fn bind(&self, entity: &Entity, id: &EntityId) -> TableResult<Entity> {
        let mut bound = entity.rebind(&self.field_structure)?;
        bound.set_id(id.clone());
        if !bound.validate() {
            return Err(SchemaError::validation_failed(bound.errors()).into());
        }
        Ok(bound)
    }

    fn check_entity(&self, id: &EntityId, entity: &Entity) -> SchemaResult<()> {
        for field in &self.fields {
            field.check_value(id, entity.get_value(field.name()).unwrap_or(&Value::Null))?;
        }
        Ok(())
    }

    fn insert_checked(&mut self, entity: Entity) -> TableResult<Entity> {
        let id = entity.id().cloned().ok_or_else(SchemaError::missing_id)?;
        if self.contains(&id)? {
            return Err(TableError::DuplicateEntity(id));
        }

        let entity = self.bind(&entity, &id)?;
        self.check_entity(&id, &entity)?;

        self.backend.append(entity.serialize())?;
        index_entity(&mut self.fields, &id, &entity)?;
        Ok(entity)
    }
}

fn index_entity(fields: &mut [TableField], id: &EntityId, entity: &Entity) -> SchemaResult<()> {
    for field in fields.iter_mut() {
        let value = entity.get_value(field.name()).cloned().unwrap_or(Value::Null);
        field.set_value(id, value)?;
    }
    Ok(())
}

impl Table<MemoryBackend> {
    /// Opens an empty in-memory table
    pub fn in_memory(name: impl Into<String>, field_structure: Vec<FieldBase>) -> TableResult<Self> {
        Self::open(name, field_structure, MemoryBackend::new())
    }
}

impl Table<JsonFileBackend> {
    /// Opens the table stored at `<store_path>/<name>.json`
    pub fn open_json(
        name: impl Into<String>,
        store_path: impl AsRef<Path>,
        field_structure: Vec<FieldBase>,
        create_if_not_exists: bool,
    ) -> TableResult<Self> {
        let name = name.into();
        let backend = JsonFileBackend::open(store_path, &name, create_if_not_exists)?;
        Self::open(name, field_structure, backend)
    }
}

impl<B: RecordBackend> DataTable for Table<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_structure(&self) -> &[FieldBase] {
        &self.field_structure
    }

    fn get_all(&self) -> TableResult<Vec<Entity>> {
        self.backend
            .load()?
            .iter()
            .map(|record| Entity::from_record(&self.field_structure, record).map_err(Into::into))
            .collect()
    }

    fn get_by_id(&self, id: &EntityId) -> TableResult<Option<Entity>> {
        let records = self.backend.load()?;
        match records.iter().find(|r| record_has_id(r, id)) {
            Some(record) => Ok(Some(Entity::from_record(&self.field_structure, record)?)),
            None => Ok(None),
        }
    }

    fn get_unique(&self, field_name: &str, value: &Value) -> TableResult<Option<Entity>> {
        let field = self
            .table_field(field_name)
            .ok_or_else(|| SchemaError::unknown_field(field_name))?;
        match field.get_unique(value)? {
            Some(id) => self.get_by_id(id),
            None => Ok(None),
        }
    }

    fn insert(&mut self, entity: Entity) -> TableResult<Entity> {
        match self.insert_checked(entity) {
            Ok(entity) => {
                if let Some(id) = entity.id() {
                    log_event(Event::EntityInserted, &self.name, &format!("id={}", id));
                }
                Ok(entity)
            }
            Err(e) => {
                log_event(Event::InsertRejected, &self.name, &e.to_string());
                Err(e)
            }
        }
    }

    fn update(&mut self, id: &EntityId, entity: Entity) -> TableResult<Option<Entity>> {
        if !self.contains(id)? {
            return Ok(None);
        }

        let entity = self.bind(&entity, id)?;
        self.check_entity(id, &entity)?;

        if !self.backend.replace(id, entity.serialize())? {
            return Ok(None);
        }
        index_entity(&mut self.fields, id, &entity)?;

        log_event(Event::EntityUpdated, &self.name, &format!("id={}", id));
        Ok(Some(entity))
    }

    fn delete(&mut self, id: &EntityId) -> TableResult<bool> {
        if !self.backend.remove(id)? {
            return Ok(false);
        }
        for field in &mut self.fields {
            field.remove(id);
        }
        log_event(Event::EntityDeleted, &self.name, &format!("id={}", id));
        Ok(true)
    }

    fn clear(&mut self) -> TableResult<()> {
        self.backend.truncate()?;
        for field in &mut self.fields {
            field.clear();
        }
        log_event(Event::TableCleared, &self.name, "");
        Ok(())
    }

    fn count(&self) -> TableResult<usize> {
        Ok(self.backend.load()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Record;
    use crate::filter::{Filter, FilterCondition};
    use crate::schema::FieldType;
    use serde_json::json;

    fn schema() -> Vec<FieldBase> {
        vec![
            FieldBase::unique("email", FieldType::Str),
            FieldBase::required("name", FieldType::Str),
            FieldBase::standard("age", FieldType::Int),
        ]
    }

    fn user(id: i64, email: &str, name: &str) -> Entity {
        Entity::with_id(
            id,
            &schema(),
            json!({"email": email, "name": name}).as_object().cloned().unwrap(),
        )
        .unwrap()
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();

        let found = table.get_by_id(&EntityId::Int(1)).unwrap().unwrap();
        assert_eq!(found.get_value("name"), Some(&json!("Ann")));
        assert_eq!(table.count().unwrap(), 1);
        assert_eq!(
            table.table_field("email").unwrap().get_value(&EntityId::Int(1)),
            Some(&json!("a@x.io"))
        );
    }

    #[test]
    fn test_insert_without_id_fails() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        let entity = Entity::from_json(&schema(), &json!({"email": "a", "name": "b"})).unwrap();
        let err = table.insert(entity).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(table.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
        let err = table.insert(user(1, "b@x.io", "Bob")).unwrap_err();
        assert!(err.is_duplicate_entity());
    }

    #[test]
    fn test_unique_violation_leaves_table_unchanged() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();

        let err = table.insert(user(2, "a@x.io", "Bob")).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(table.count().unwrap(), 1);
        assert!(table.table_field("name").unwrap().get_value(&EntityId::Int(2)).is_none());
    }

    #[test]
    fn test_insert_rebinds_to_table_schema() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        let foreign = vec![FieldBase::standard("nickname", FieldType::Str)];
        let entity = Entity::with_id(1, &foreign, record(json!({"nickname": "x"}))).unwrap();
        let err = table.insert(entity).unwrap_err();
        assert_eq!(err.schema_code(), Some(crate::schema::SchemaErrorCode::StoreUnknownField));
    }

    #[test]
    fn test_get_unique() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
        table.insert(user(2, "b@x.io", "Bob")).unwrap();

        let bob = table.get_unique("email", &json!("b@x.io")).unwrap().unwrap();
        assert_eq!(bob.id(), Some(&EntityId::Int(2)));
        assert!(table.get_unique("email", &json!("c@x.io")).unwrap().is_none());

        let err = table.get_unique("name", &json!("Ann")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(table.get_unique("missing", &json!(1)).is_err());
    }

    #[test]
    fn test_update() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
        table.insert(user(2, "b@x.io", "Bob")).unwrap();

        // own unique value may be kept
        let updated = table
            .update(&EntityId::Int(1), user(99, "a@x.io", "Annie"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id(), Some(&EntityId::Int(1)));
        assert_eq!(
            table.get_by_id(&EntityId::Int(1)).unwrap().unwrap().get_value("name"),
            Some(&json!("Annie"))
        );

        // another entity's unique value may not
        let err = table.update(&EntityId::Int(1), user(1, "b@x.io", "Ann")).unwrap_err();
        assert!(err.is_constraint_violation());

        assert!(table.update(&EntityId::Int(7), user(7, "c@x.io", "C")).unwrap().is_none());
    }

    #[test]
    fn test_update_frees_old_unique_value() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
        table.update(&EntityId::Int(1), user(1, "new@x.io", "Ann")).unwrap();
        table.insert(user(2, "a@x.io", "Bob")).unwrap();
        assert_eq!(table.count().unwrap(), 2);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "Ann")).unwrap();
        table.insert(user(2, "b@x.io", "Bob")).unwrap();

        assert!(table.delete(&EntityId::Int(1)).unwrap());
        assert!(!table.delete(&EntityId::Int(1)).unwrap());
        table.insert(user(3, "a@x.io", "Cid")).unwrap();

        table.clear().unwrap();
        assert_eq!(table.count().unwrap(), 0);
        assert!(table.table_field("email").unwrap().is_empty());
    }

    #[test]
    fn test_insert_many_keeps_prior_commits() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        let err = table
            .insert_many(vec![
                user(1, "a@x.io", "Ann"),
                user(2, "b@x.io", "Bob"),
                user(3, "a@x.io", "Dup"),
                user(4, "d@x.io", "Dan"),
            ])
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(table.count().unwrap(), 2);
    }

    #[test]
    fn test_get_by_filter() {
        let mut table = MemoryTable::in_memory("users", schema()).unwrap();
        table.insert(user(1, "a@x.io", "John Doe")).unwrap();
        table.insert(user(2, "b@x.io", "Jane Doe")).unwrap();
        table.insert(user(3, "c@x.io", "Mary Poppins")).unwrap();

        let filter = Filter::and(vec![FilterCondition::contains("name", "Doe")]);
        assert_eq!(table.get_by_filter(&filter).unwrap().len(), 2);

        let narrower = Filter::and(vec![FilterCondition::contains("name", "Jane")]);
        let hits = table.get_by_filters(&[filter, narrower]).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), Some(&EntityId::Int(2)));
    }

    #[test]
    fn test_open_rebuilds_index_from_backend() {
        let backend = MemoryBackend::with_records(vec![
            record(json!({"id": 1, "email": "a@x.io", "name": "Ann"})),
            record(json!({"id": 2, "email": "b@x.io", "name": "Bob"})),
        ]);
        let mut table = Table::open("users", schema(), backend).unwrap();

        let err = table.insert(user(3, "a@x.io", "Dup")).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(table.get_unique("email", &json!("b@x.io")).unwrap().is_some());
    }

    #[test]
    fn test_open_rejects_inconsistent_backend() {
        let dup_value = MemoryBackend::with_records(vec![
            record(json!({"id": 1, "email": "a@x.io", "name": "Ann"})),
            record(json!({"id": 2, "email": "a@x.io", "name": "Bob"})),
        ]);
        assert!(Table::open("users", schema(), dup_value).is_err());

        let dup_id = MemoryBackend::with_records(vec![
            record(json!({"id": 1, "email": "a@x.io", "name": "Ann"})),
            record(json!({"id": 1, "email": "b@x.io", "name": "Bob"})),
        ]);
        let err = Table::open("users", schema(), dup_id).unwrap_err();
        assert!(err.is_duplicate_entity());

        let no_id = MemoryBackend::with_records(vec![record(json!({"email": "a", "name": "b"}))]);
        assert!(Table::open("users", schema(), no_id).is_err());
    }

    #[test]
    fn test_open_rejects_bad_structure() {
        let fields = vec![
            FieldBase::standard("name", FieldType::Str),
            FieldBase::standard("name", FieldType::Str),
        ];
        assert!(MemoryTable::in_memory("users", fields).is_err());
    }
}
