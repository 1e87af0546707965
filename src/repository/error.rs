use sea_orm::{DbBackend, DbErr};

use crate::mapping::ShapeConflict;

/// Error type for repository operations.
///
/// Driver and ORM failures pass through untouched as [`RepositoryError::Database`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("Failed to map row into {target}: {source}")]
    Mapping {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    ShapeConflict(#[from] ShapeConflict),

    #[error("Command timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Stored procedures are not supported on {0:?}")]
    UnsupportedBackend(DbBackend),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
