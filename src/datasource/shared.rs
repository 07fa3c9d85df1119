//! Thread-safe handle to a data source
//!
//! One lock guards the whole source, so id assignment and the insert it
//! belongs to are never interleaved with another writer.

use std::sync::{Arc, Mutex, PoisonError};

use super::source::DataSource;
use crate::entity::{Entity, EntityId};
use crate::filter::Filter;
use crate::table::TableResult;

/// Cloneable, lock-protected [`DataSource`]
#[derive(Debug, Clone, Default)]
pub struct SharedDataSource {
    inner: Arc<Mutex<DataSource>>,
}

impl SharedDataSource {
    /// Wraps a data source
    pub fn new(source: DataSource) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Runs `f` with exclusive access.
    ///
    /// A panic in an earlier holder does not lock the source out: every
    /// table write completes or is rejected before the backend is touched.
    pub fn with<R>(&self, f: impl FnOnce(&mut DataSource) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// See [`DataSource::insert`]
    pub fn insert(&self, table: &str, entity: Entity) -> TableResult<Option<Entity>> {
        self.with(|ds| ds.insert(table, entity))
    }

    /// See [`DataSource::get_all`]
    pub fn get_all(&self, table: &str) -> TableResult<Option<Vec<Entity>>> {
        self.with(|ds| ds.get_all(table))
    }

    /// See [`DataSource::get_by_id`]
    pub fn get_by_id(&self, table: &str, id: &EntityId) -> TableResult<Option<Entity>> {
        self.with(|ds| ds.get_by_id(table, id))
    }

    /// See [`DataSource::get_by_filter`]
    pub fn get_by_filter(&self, table: &str, filter: &Filter) -> TableResult<Option<Vec<Entity>>> {
        self.with(|ds| ds.get_by_filter(table, filter))
    }

    /// See [`DataSource::update`]
    pub fn update(
        &self,
        table: &str,
        id: &EntityId,
        entity: Entity,
    ) -> TableResult<Option<Entity>> {
        self.with(|ds| ds.update(table, id, entity))
    }

    /// See [`DataSource::delete`]
    pub fn delete(&self, table: &str, id: &EntityId) -> TableResult<bool> {
        self.with(|ds| ds.delete(table, id))
    }
}
