//! Filter configuration errors

use thiserror::Error;

/// Result type for filter parsing
pub type FilterResult<T> = Result<T, FilterError>;

/// Misconfigured filters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown filter combination: {0}")]
    UnknownCombination(String),

    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid filter: {0}")]
    Invalid(String),
}
