//! Per-field value index
//!
//! Maps entity ids to the value each entity holds for one field. This is
//! derived state: the backend is the source of truth and tables rebuild
//! the index from it on open.
//!
//! # API
//!
//! - `check_value(id, value)` - Constraint check without writing
//! - `set_value(id, value)` - Checked write
//! - `get_value(id)` - Stored value
//! - `get_unique(value)` - Owner of a value, unique fields only
//! - `remove(id)` / `clear()`

use std::collections::BTreeMap;

use serde_json::Value;

use crate::entity::EntityId;
use crate::schema::{FieldBase, SchemaError, SchemaResult};
use crate::value::values_equal;

/// Runtime state of one declared field of a table.
#[derive(Debug, Clone)]
pub struct TableField {
    base: FieldBase,
    entries: BTreeMap<EntityId, Value>,
}

impl TableField {
    /// Creates an empty index for a declaration
    pub fn new(base: FieldBase) -> Self {
        Self {
            base,
            entries: BTreeMap::new(),
        }
    }

    /// The declaration this index tracks
    pub fn base(&self) -> &FieldBase {
        &self.base
    }

    /// Field name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Checks whether `entity_id` may hold `value`.
    ///
    /// The entity's own current entry never counts as a duplicate.
    ///
    /// # Errors
    ///
    /// `STORE_CONSTRAINT_VIOLATION` if the field is mandatory and `value`
    /// is null, or the field is unique and another entity holds `value`.
    pub fn check_value(&self, entity_id: &EntityId, value: &Value) -> SchemaResult<()> {
        let key_type = self.base.key_type();

        if key_type.is_mandatory() && value.is_null() {
            return Err(SchemaError::null_value(self.name()));
        }

        if key_type.is_unique() {
            // Linear scan over live values
            let taken = self
                .entries
                .iter()
                .any(|(owner, existing)| owner != entity_id && values_equal(existing, value));
            if taken {
                return Err(SchemaError::duplicate_value(self.name(), value));
            }
        }

        Ok(())
    }

    /// Writes the value held by `entity_id`.
    ///
    /// # Errors
    ///
    /// Same as [`check_value`](Self::check_value); the index is unchanged
    /// on error.
    pub fn set_value(&mut self, entity_id: &EntityId, value: Value) -> SchemaResult<()> {
        self.check_value(entity_id, &value)?;
        self.entries.insert(entity_id.clone(), value);
        Ok(())
    }

    /// Value held by `entity_id`
    pub fn get_value(&self, entity_id: &EntityId) -> Option<&Value> {
        self.entries.get(entity_id)
    }

    /// Id of the entity holding `value`.
    ///
    /// # Errors
    ///
    /// `STORE_CONFIGURATION_ERROR` if the field is not unique.
    pub fn get_unique(&self, value: &Value) -> SchemaResult<Option<&EntityId>> {
        if !self.base.key_type().is_unique() {
            return Err(SchemaError::not_unique(self.name()));
        }
        Ok(self
            .entries
            .iter()
            .find(|(_, existing)| values_equal(existing, value))
            .map(|(owner, _)| owner))
    }

    /// Drops the entry of `entity_id`
    pub fn remove(&mut self, entity_id: &EntityId) -> Option<Value> {
        self.entries.remove(entity_id)
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of tracked entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entity is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
