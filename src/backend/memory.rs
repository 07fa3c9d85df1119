//! # In-Memory Backend

use super::errors::BackendResult;
use super::{record_has_id, RecordBackend};
use crate::entity::{EntityId, Record};

/// Volatile backend holding records in a vector
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    records: Vec<Record>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend seeded with records
    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordBackend for MemoryBackend {
    fn load(&self) -> BackendResult<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn store(&mut self, records: Vec<Record>) -> BackendResult<()> {
        self.records = records;
        Ok(())
    }

    fn append(&mut self, record: Record) -> BackendResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn replace(&mut self, id: &EntityId, record: Record) -> BackendResult<bool> {
        match self.records.iter_mut().find(|r| record_has_id(r, id)) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, id: &EntityId) -> BackendResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| !record_has_id(r, id));
        Ok(self.records.len() != before)
    }

    fn truncate(&mut self) -> BackendResult<()> {
        self.records.clear();
        Ok(())
    }
}
