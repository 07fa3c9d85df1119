//! recordstore - typed, schema-validated record storage
//!
//! Tables of flat records with declared fields, primary/unique/required
//! constraints, predicate filtering and pluggable backends, registered
//! in a data source that owns id assignment.

pub mod backend;
pub mod config;
pub mod datasource;
pub mod entity;
pub mod filter;
pub mod index;
pub mod observability;
pub mod schema;
pub mod table;
pub mod value;

pub use config::DataSourceConfig;
pub use datasource::{DataSource, IdType, SharedDataSource};
pub use entity::{Entity, EntityField, EntityId, Record};
pub use filter::{Combination, Filter, FilterCondition, Operator};
pub use schema::{FieldBase, FieldKeyType, FieldType};
pub use table::{DataTable, JsonTable, MemoryTable, Table, TableError, TableResult};
