//! # Record Backends
//!
//! Raw storage of flat records. A backend knows nothing about schemas or
//! constraints; tables layer those on top.
//!
//! The required surface is `load` and `store`. The row-level operations
//! default to a read-modify-write of the full record set; backends with a
//! cheaper path override them.

mod errors;
mod json;
mod memory;

pub use errors::{BackendError, BackendResult};
pub use json::JsonFileBackend;
pub use memory::MemoryBackend;

use std::fmt;

use crate::entity::{EntityId, Record};
use crate::schema::ID_KEY;

/// Whether a record carries the given id
pub fn record_has_id(record: &Record, id: &EntityId) -> bool {
    record.get(ID_KEY).is_some_and(|v| id.matches(v))
}

/// Backend trait for record storage
pub trait RecordBackend: Send + fmt::Debug {
    /// Read every stored record, in storage order
    fn load(&self) -> BackendResult<Vec<Record>>;

    /// Replace the full record set
    fn store(&mut self, records: Vec<Record>) -> BackendResult<()>;

    /// Append one record
    fn append(&mut self, record: Record) -> BackendResult<()> {
        let mut records = self.load()?;
        records.push(record);
        self.store(records)
    }

    /// Overwrite the record with `id`. Returns false if absent.
    fn replace(&mut self, id: &EntityId, record: Record) -> BackendResult<bool> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| record_has_id(r, id)) {
            Some(slot) => {
                *slot = record;
                self.store(records)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete the record with `id`. Returns false if absent.
    fn remove(&mut self, id: &EntityId) -> BackendResult<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| !record_has_id(r, id));
        if records.len() == before {
            return Ok(false);
        }
        self.store(records)?;
        Ok(true)
    }

    /// Delete every record
    fn truncate(&mut self) -> BackendResult<()> {
        self.store(Vec::new())
    }
}
