//! Tables
//!
//! [`DataTable`] is the CRUD contract shared by every table.
//! [`Table`] implements it for any [`RecordBackend`](crate::backend::RecordBackend),
//! layering schema binding, validation and the per-field index over raw
//! record storage.

mod contract;
mod errors;
mod schema_table;

pub use contract::DataTable;
pub use errors::{TableError, TableResult};
pub use schema_table::{JsonTable, MemoryTable, Table};
