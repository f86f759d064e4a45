//! Collaborator traits consumed by the approval workflow.
//!
//! The workflow never talks to a database client directly. Everything it
//! needs is passed in as one of these traits, so the same guard logic runs
//! against libSQL (`grid-db`) and against in-memory doubles in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ColumnDefinition, DataEntry, DataHistory, Notification};
use crate::enums::EntryStatus;
use crate::errors::{NotifyError, StoreError};
use crate::payload::EntryPayload;

/// Fields of a new draft entry. The store assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub category_id: String,
    pub school_id: String,
    pub created_by: String,
    pub payload: EntryPayload,
    pub created_at: DateTime<Utc>,
}

/// Fields of a history row. The store assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistory {
    pub entry_id: String,
    pub actor_id: String,
    pub previous_status: EntryStatus,
    pub status: EntryStatus,
    pub payload: EntryPayload,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filter criteria for entry listings. Results are ordered by `updated_at`
/// descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub category_id: Option<String>,
    pub school_id: Option<String>,
    pub status: Option<EntryStatus>,
    pub created_by: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Persistence of data entries.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn read_entry(&self, id: &str) -> Result<DataEntry, StoreError>;

    /// Insert a draft entry (version 1).
    ///
    /// Returns `StoreError::Conflict` if the (category, school) pair already
    /// has an entry.
    async fn insert_entry(&self, entry: &NewEntry) -> Result<DataEntry, StoreError>;

    /// Replace the stored entry with `next` only if it is still in
    /// `expected_status` at `expected_version`.
    ///
    /// Returns `StoreError::Conflict` when the row moved on since it was read.
    async fn compare_and_swap(
        &self,
        next: &DataEntry,
        expected_status: EntryStatus,
        expected_version: u32,
    ) -> Result<(), StoreError>;

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<DataEntry>, StoreError>;
}

/// Append-only persistence of history rows.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert_history(&self, record: &NewHistory) -> Result<DataHistory, StoreError>;

    /// All history rows of an entry, newest first.
    async fn history(&self, entry_id: &str) -> Result<Vec<DataHistory>, StoreError>;
}

/// Column definitions per category.
#[async_trait]
pub trait ColumnCatalog: Send + Sync {
    /// Returns `StoreError::NotFound` if the category does not exist.
    async fn columns_for(&self, category_id: &str) -> Result<Vec<ColumnDefinition>, StoreError>;
}

/// Permission checks.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Whether `actor_id` may approve or reject `entry`.
    async fn has_approval_capability(
        &self,
        actor_id: &str,
        entry: &DataEntry,
    ) -> Result<bool, StoreError>;

    /// Users who should be told that `entry` is waiting for review.
    async fn approvers_for(&self, entry: &DataEntry) -> Result<Vec<String>, StoreError>;
}

/// Outbound notification dispatch. Delivery is best-effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}
