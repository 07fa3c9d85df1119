//! Filter engine
//!
//! Filters documents strictly per condition, evaluated on fully
//! materialized entities. There is no indexed query path; the only
//! shortcut is the unique-field lookup on tables.
//!
//! # Operators
//!
//! - EQUAL / NOT_EQUAL
//! - GREATER_THAN / LESS_THAN and their OR_EQUAL forms
//! - IN / NOT_IN (probe is a list)
//! - LIKE / CONTAINS and their NOT_ forms
//! - IS_NULL / IS_NOT_NULL (probe only decides the pass-through)

mod errors;
mod matcher;
mod types;

pub use errors::{FilterError, FilterResult};
pub use matcher::filter_entities;
pub use types::{Combination, Filter, FilterCondition, Operator};
