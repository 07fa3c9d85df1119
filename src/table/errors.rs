//! # Table Errors

use thiserror::Error;

use crate::backend::BackendError;
use crate::entity::EntityId;
use crate::filter::FilterError;
use crate::schema::{SchemaError, SchemaErrorCode};

/// Result type for table and data source operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised by table operations
#[derive(Debug, Error)]
pub enum TableError {
    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("Entity with id {0} already exists")]
    DuplicateEntity(EntityId),

    #[error("No unused id left in table '{table}' after {attempts} draws")]
    IdSpaceExhausted { table: String, attempts: usize },

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl TableError {
    /// REQUIRED/UNIQUE violation, or a write without an id
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, TableError::Schema(e) if e.is_constraint_violation())
    }

    /// Operation misused against the schema, or a bad filter
    pub fn is_configuration_error(&self) -> bool {
        match self {
            TableError::Schema(e) => e.code() == SchemaErrorCode::StoreConfigurationError,
            TableError::Filter(_) => true,
            _ => false,
        }
    }

    /// Insert hit an id already present
    pub fn is_duplicate_entity(&self) -> bool {
        matches!(self, TableError::DuplicateEntity(_))
    }

    /// Schema error code, if this wraps one
    pub fn schema_code(&self) -> Option<SchemaErrorCode> {
        match self {
            TableError::Schema(e) => Some(e.code()),
            _ => None,
        }
    }
}
