//! The table contract
//!
//! Every table, whatever stores it, exposes the same CRUD surface. Reads
//! always return freshly materialized entities; filtering always runs over
//! the full materialized set.

use std::fmt;

use serde_json::Value;

use super::errors::TableResult;
use crate::entity::{Entity, EntityId};
use crate::filter::{filter_entities, Filter};
use crate::schema::FieldBase;

/// CRUD surface shared by all tables.
pub trait DataTable: Send + fmt::Debug {
    /// Table name, unique within a data source
    fn name(&self) -> &str;

    /// Declared fields in order
    fn field_structure(&self) -> &[FieldBase];

    /// Every live entity, in storage order
    fn get_all(&self) -> TableResult<Vec<Entity>>;

    /// Entity with `id`, reflecting the latest write
    fn get_by_id(&self, id: &EntityId) -> TableResult<Option<Entity>>;

    /// Entity holding `value` on the unique field `field_name`.
    ///
    /// Fails with a configuration error on a field that is not unique.
    fn get_unique(&self, field_name: &str, value: &Value) -> TableResult<Option<Entity>>;

    /// Entities matching `filter`
    fn get_by_filter(&self, filter: &Filter) -> TableResult<Vec<Entity>> {
        Ok(filter_entities(self.get_all()?, filter))
    }

    /// Entities matching every filter in `filters`
    fn get_by_filters(&self, filters: &[Filter]) -> TableResult<Vec<Entity>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|e| filters.iter().all(|f| e.matches_criteria(f)))
            .collect())
    }

    /// Stores a new entity. Its id must already be assigned.
    fn insert(&mut self, entity: Entity) -> TableResult<Entity>;

    /// Inserts one entity at a time.
    ///
    /// Stops at the first failure. Entities inserted before it stay
    /// committed.
    fn insert_many(&mut self, entities: Vec<Entity>) -> TableResult<Vec<Entity>> {
        let mut inserted = Vec::with_capacity(entities.len());
        for entity in entities {
            inserted.push(self.insert(entity)?);
        }
        Ok(inserted)
    }

    /// Replaces the entity with `id`. `None` if absent.
    fn update(&mut self, id: &EntityId, entity: Entity) -> TableResult<Option<Entity>>;

    /// Removes the entity with `id`. `false` if absent.
    fn delete(&mut self, id: &EntityId) -> TableResult<bool>;

    /// Removes every entity
    fn clear(&mut self) -> TableResult<()>;

    /// Number of live entities
    fn count(&self) -> TableResult<usize> {
        Ok(self.get_all()?.len())
    }
}
