//! `grid-core` port implementations backed by libSQL.

use async_trait::async_trait;

use grid_core::entities::{ColumnDefinition, DataEntry, DataHistory, Notification};
use grid_core::enums::EntryStatus;
use grid_core::errors::{NotifyError, StoreError};
use grid_core::ports::{
    Authorizer, ColumnCatalog, EntryFilter, EntryStore, HistoryStore, NewEntry, NewHistory,
    Notifier,
};

use crate::repos::entry::SwapOutcome;
use crate::service::GridService;

#[async_trait]
impl EntryStore for GridService {
    async fn read_entry(&self, id: &str) -> Result<DataEntry, StoreError> {
        self.get_entry(id)
            .await
            .map_err(|e| e.into_store_error("entry", id))
    }

    async fn insert_entry(&self, entry: &NewEntry) -> Result<DataEntry, StoreError> {
        Ok(Self::insert_entry(self, entry).await?)
    }

    async fn compare_and_swap(
        &self,
        next: &DataEntry,
        expected_status: EntryStatus,
        expected_version: u32,
    ) -> Result<(), StoreError> {
        match self.swap_entry(next, expected_status, expected_version).await? {
            SwapOutcome::Applied => Ok(()),
            SwapOutcome::Stale => Err(StoreError::Conflict(format!(
                "entry {} is no longer {expected_status} at version {expected_version}",
                next.id
            ))),
            SwapOutcome::Missing => Err(StoreError::NotFound {
                entity: "entry",
                id: next.id.clone(),
            }),
        }
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<DataEntry>, StoreError> {
        Ok(Self::list_entries(self, filter).await?)
    }
}

#[async_trait]
impl HistoryStore for GridService {
    async fn insert_history(&self, record: &NewHistory) -> Result<DataHistory, StoreError> {
        Ok(self.append_history(record).await?)
    }

    async fn history(&self, entry_id: &str) -> Result<Vec<DataHistory>, StoreError> {
        Ok(self.entry_history(entry_id).await?)
    }
}

#[async_trait]
impl ColumnCatalog for GridService {
    async fn columns_for(&self, category_id: &str) -> Result<Vec<ColumnDefinition>, StoreError> {
        self.get_category(category_id)
            .await
            .map_err(|e| e.into_store_error("category", category_id))?;
        Ok(self.list_columns(category_id).await?)
    }
}

#[async_trait]
impl Authorizer for GridService {
    async fn has_approval_capability(
        &self,
        actor_id: &str,
        entry: &DataEntry,
    ) -> Result<bool, StoreError> {
        self.can_approve_school(actor_id, &entry.school_id)
            .await
            .map_err(|e| e.into_store_error("school", &entry.school_id))
    }

    async fn approvers_for(&self, entry: &DataEntry) -> Result<Vec<String>, StoreError> {
        self.approvers_for_school(&entry.school_id)
            .await
            .map_err(|e| e.into_store_error("school", &entry.school_id))
    }
}

/// Delivers notifications into the recipient's stored inbox.
#[async_trait]
impl Notifier for GridService {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.enqueue_notification(notification)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError {
                recipient_id: notification.recipient_id.clone(),
                reason: e.to_string(),
            })
    }
}
