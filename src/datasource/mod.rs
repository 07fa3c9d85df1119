//! Data source
//!
//! A [`DataSource`] holds named tables and decides the id of every entity
//! inserted through it. [`SharedDataSource`] shares one across threads.

mod id_gen;
mod shared;
mod source;

pub use id_gen::{
    random_string_id, sequential_id, unused_string_id, uuid_id, IdType,
    DEFAULT_STRING_ID_LENGTH, MAX_STRING_ID_ATTEMPTS,
};
pub use shared::SharedDataSource;
pub use source::DataSource;
