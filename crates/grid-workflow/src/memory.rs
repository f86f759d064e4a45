//! In-memory collaborators.
//!
//! `MemoryStore` keeps entries, history, and column definitions in process
//! and can be told to fail or stall, so the workflow's retry, rollback, and
//! timeout paths can be exercised without a database.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use grid_core::entities::{ColumnDefinition, DataEntry, DataHistory, Notification};
use grid_core::enums::EntryStatus;
use grid_core::errors::{NotifyError, StoreError};
use grid_core::ports::{
    Authorizer, ColumnCatalog, EntryFilter, EntryStore, HistoryStore, NewEntry, NewHistory,
    Notifier,
};

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, DataEntry>,
    /// Insertion order is the tie-break for equal timestamps.
    history: Vec<DataHistory>,
    columns: BTreeMap<String, Vec<ColumnDefinition>>,
    next_id: u32,
    swap_calls: u32,
}

#[derive(Debug, Default)]
struct Faults {
    /// Fail this many upcoming swaps with `Unavailable` without applying them.
    swaps_unavailable: u32,
    /// Apply this many upcoming swaps but still report `Unavailable`.
    swaps_lost_ack: u32,
    /// Fail this many upcoming history inserts with `Unavailable`.
    history_unavailable: u32,
    /// Sleep this long before answering any call.
    latency: Option<Duration>,
}

/// Entry, history, and column storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    faults: Mutex<Faults>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the columns of a category.
    pub async fn add_category(&self, category_id: &str, columns: Vec<ColumnDefinition>) {
        self.state
            .lock()
            .await
            .columns
            .insert(category_id.to_string(), columns);
    }

    pub async fn fail_next_swaps(&self, count: u32) {
        self.faults.lock().await.swaps_unavailable = count;
    }

    pub async fn lose_next_swap_acks(&self, count: u32) {
        self.faults.lock().await.swaps_lost_ack = count;
    }

    pub async fn fail_next_history_inserts(&self, count: u32) {
        self.faults.lock().await.history_unavailable = count;
    }

    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.faults.lock().await.latency = latency;
    }

    /// Number of compare-and-swap calls received so far.
    pub async fn swap_calls(&self) -> u32 {
        self.state.lock().await.swap_calls
    }

    async fn stall(&self) {
        let latency = self.faults.lock().await.latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn next_id(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{prefix}-{:08x}", state.next_id)
    }
}

fn take_fault(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn read_entry(&self, id: &str) -> Result<DataEntry, StoreError> {
        self.stall().await;
        self.state
            .lock()
            .await
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "entry",
                id: id.to_string(),
            })
    }

    async fn insert_entry(&self, entry: &NewEntry) -> Result<DataEntry, StoreError> {
        self.stall().await;
        let mut state = self.state.lock().await;
        let duplicate = state
            .entries
            .values()
            .any(|e| e.category_id == entry.category_id && e.school_id == entry.school_id);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "category {} already has an entry for school {}",
                entry.category_id, entry.school_id
            )));
        }

        let id = Self::next_id(&mut state, "ent");
        let stored = DataEntry::draft(
            id.as_str(),
            entry.category_id.as_str(),
            entry.school_id.as_str(),
            entry.created_by.as_str(),
            entry.payload.clone(),
            entry.created_at,
        );
        state.entries.insert(id, stored.clone());
        Ok(stored)
    }

    async fn compare_and_swap(
        &self,
        next: &DataEntry,
        expected_status: EntryStatus,
        expected_version: u32,
    ) -> Result<(), StoreError> {
        self.stall().await;
        let (unavailable, lost_ack) = {
            let mut faults = self.faults.lock().await;
            let unavailable = take_fault(&mut faults.swaps_unavailable);
            let lost_ack = !unavailable && take_fault(&mut faults.swaps_lost_ack);
            (unavailable, lost_ack)
        };

        let mut state = self.state.lock().await;
        state.swap_calls += 1;
        if unavailable {
            return Err(StoreError::Unavailable("injected swap failure".into()));
        }

        let Some(current) = state.entries.get_mut(&next.id) else {
            return Err(StoreError::NotFound {
                entity: "entry",
                id: next.id.clone(),
            });
        };
        if current.status != expected_status || current.version != expected_version {
            return Err(StoreError::Conflict(format!(
                "entry {} is {} at version {}",
                next.id, current.status, current.version
            )));
        }
        *current = next.clone();

        if lost_ack {
            return Err(StoreError::Unavailable("injected lost acknowledgement".into()));
        }
        Ok(())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<DataEntry>, StoreError> {
        self.stall().await;
        let state = self.state.lock().await;
        let mut entries: Vec<DataEntry> = state
            .entries
            .values()
            .filter(|e| filter.category_id.as_ref().is_none_or(|c| &e.category_id == c))
            .filter(|e| filter.school_id.as_ref().is_none_or(|s| &e.school_id == s))
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| filter.created_by.as_ref().is_none_or(|u| &e.created_by == u))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.unwrap_or(100) as usize;
        Ok(entries.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn insert_history(&self, record: &NewHistory) -> Result<DataHistory, StoreError> {
        self.stall().await;
        if take_fault(&mut self.faults.lock().await.history_unavailable) {
            return Err(StoreError::Unavailable("injected history failure".into()));
        }

        let mut state = self.state.lock().await;
        if !state.entries.contains_key(&record.entry_id) {
            return Err(StoreError::Conflict(format!(
                "history references unknown entry {}",
                record.entry_id
            )));
        }
        let row = DataHistory {
            id: Self::next_id(&mut state, "his"),
            entry_id: record.entry_id.clone(),
            actor_id: record.actor_id.clone(),
            previous_status: record.previous_status,
            status: record.status,
            payload: record.payload.clone(),
            comment: record.comment.clone(),
            created_at: record.created_at,
        };
        state.history.push(row.clone());
        Ok(row)
    }

    async fn history(&self, entry_id: &str) -> Result<Vec<DataHistory>, StoreError> {
        self.stall().await;
        let state = self.state.lock().await;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|h| h.entry_id == entry_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ColumnCatalog for MemoryStore {
    async fn columns_for(&self, category_id: &str) -> Result<Vec<ColumnDefinition>, StoreError> {
        self.stall().await;
        self.state
            .lock()
            .await
            .columns
            .get(category_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "category",
                id: category_id.to_string(),
            })
    }
}

/// Grants approval capability to a fixed set of users, for every entry.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    approvers: BTreeSet<String>,
}

impl StaticAuthorizer {
    #[must_use]
    pub fn new<I, S>(approvers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            approvers: approvers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn has_approval_capability(
        &self,
        actor_id: &str,
        _entry: &DataEntry,
    ) -> Result<bool, StoreError> {
        Ok(self.approvers.contains(actor_id))
    }

    async fn approvers_for(&self, _entry: &DataEntry) -> Result<Vec<String>, StoreError> {
        Ok(self.approvers.iter().cloned().collect())
    }
}

/// Records every notification it is given, or refuses all of them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    refuse: bool,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every `send` fails.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// A notifier that sleeps for `delay` before recording each send.
    #[must_use]
    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.refuse {
            return Err(NotifyError {
                recipient_id: notification.recipient_id.clone(),
                reason: "notifier refused delivery".into(),
            });
        }
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}
