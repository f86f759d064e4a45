//! Service layer wrapping the database handle.
//!
//! `GridService` owns a `GridDb`. All repo methods are implemented as
//! `impl GridService` blocks under [`crate::repos`], and the `grid-core`
//! ports are implemented for it in [`crate::ports`].

use crate::GridDb;
use crate::error::DatabaseError;

/// Orchestrates database reads and writes for every Schoolgrid table.
pub struct GridService {
    db: GridDb,
}

impl GridService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = GridDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `GridDb`.
    #[must_use]
    pub const fn from_db(db: GridDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GridDb {
        &self.db
    }
}
