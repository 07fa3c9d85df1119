//! Observable events
//!
//! Events are explicit and typed. Each has a stable name used as the
//! `event` field of the emitted log line.

use std::fmt;

/// Observable events of the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Table lifecycle
    /// Table opened and its index rebuilt
    TableOpened,
    /// Field index rebuilt from the backend
    IndexRefreshed,
    /// Table registered on a data source
    TableRegistered,
    /// Registration skipped, name already taken
    TableRegisterSkipped,
    /// Table removed from a data source
    TableDropped,

    // Writes
    /// Entity written
    EntityInserted,
    /// Entity replaced
    EntityUpdated,
    /// Entity removed
    EntityDeleted,
    /// Every entity removed
    TableCleared,
    /// Insert refused by a constraint or a duplicate id
    InsertRejected,

    // Ids
    /// Id assigned by the data source
    IdAllocated,
}

impl Event {
    /// Stable event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::TableOpened => "TABLE_OPENED",
            Event::IndexRefreshed => "INDEX_REFRESHED",
            Event::TableRegistered => "TABLE_REGISTERED",
            Event::TableRegisterSkipped => "TABLE_REGISTER_SKIPPED",
            Event::TableDropped => "TABLE_DROPPED",
            Event::EntityInserted => "ENTITY_INSERTED",
            Event::EntityUpdated => "ENTITY_UPDATED",
            Event::EntityDeleted => "ENTITY_DELETED",
            Event::TableCleared => "TABLE_CLEARED",
            Event::InsertRejected => "INSERT_REJECTED",
            Event::IdAllocated => "ID_ALLOCATED",
        }
    }

    /// Whether the event reports a refused operation
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::InsertRejected | Event::TableRegisterSkipped)
    }

    /// Whether the event is routine per-row detail
    pub fn is_verbose(&self) -> bool {
        matches!(
            self,
            Event::EntityInserted | Event::EntityUpdated | Event::EntityDeleted | Event::IdAllocated
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
