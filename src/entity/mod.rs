//! Entities: record instances bound to a schema
//!
//! Entities are never cached. Tables rebuild them from backend records on
//! every read.

mod field;
mod id;
mod record;

pub use field::EntityField;
pub use id::EntityId;
pub use record::{record_id, Entity, Record};
