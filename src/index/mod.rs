//! Table field index subsystem
//!
//! Indexes are derived, in-memory-only state rebuilt from the backend.
//!
//! # Design Principles
//!
//! - Derived state: the index mirrors the backend, never the source of truth
//! - In-memory only: no persistence
//! - Deterministic: BTreeMap iteration order
//!
//! # Invariants
//!
//! - Unique fields never hold the same value for two entities
//! - Mandatory fields never hold null

mod table_field;

pub use table_field::TableField;
