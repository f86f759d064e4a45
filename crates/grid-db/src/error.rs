//! Database error types for grid-db.

use grid_core::errors::StoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., a referenced row is missing).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the error is a UNIQUE / CHECK / FOREIGN KEY violation.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::LibSql(e) => {
                let msg = e.to_string();
                msg.contains("constraint failed") || msg.contains("append-only")
            }
            _ => false,
        }
    }

    /// Convert into a port error, reporting `NoResult` as `entity`/`id` not found.
    #[must_use]
    pub fn into_store_error(self, entity: &'static str, id: &str) -> StoreError {
        match self {
            Self::NoResult => StoreError::NotFound {
                entity,
                id: id.to_string(),
            },
            other => other.into(),
        }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(e: DatabaseError) -> Self {
        if e.is_constraint_violation() {
            Self::Conflict(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}
