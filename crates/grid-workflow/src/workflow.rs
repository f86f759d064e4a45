//! The approval workflow: transition guard plus audit recording.
//!
//! Every operation follows the same order: argument validation, entry load,
//! status precondition, capability check, conditional write, history insert,
//! notification. A write is durable only once its history row exists; if the
//! insert fails the entry is swapped back to its previous state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use grid_config::WorkflowConfig;
use grid_core::entities::{ColumnDefinition, DataEntry, DataHistory};
use grid_core::enums::{EntryStatus, Transition};
use grid_core::errors::{CoreError, StoreError};
use grid_core::payload::{EntryPayload, Strictness, Violation, validate};
use grid_core::ports::{
    Authorizer, ColumnCatalog, EntryFilter, EntryStore, HistoryStore, NewEntry, NewHistory,
    Notifier,
};

use crate::error::WorkflowError;
use crate::notify::transition_notifications;
use crate::retry::RetryPolicy;

/// The ports the workflow runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub entries: Arc<dyn EntryStore>,
    pub history: Arc<dyn HistoryStore>,
    pub catalog: Arc<dyn ColumnCatalog>,
    pub authorizer: Arc<dyn Authorizer>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Use one value for every port (e.g. a database-backed service).
    pub fn shared<T>(backend: Arc<T>) -> Self
    where
        T: EntryStore + HistoryStore + ColumnCatalog + Authorizer + Notifier + 'static,
    {
        Self {
            entries: backend.clone(),
            history: backend.clone(),
            catalog: backend.clone(),
            authorizer: backend.clone(),
            notifier: backend,
        }
    }

    /// Replace the notifier, keeping the other ports.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

/// Who does what to which entry; threaded through error construction.
#[derive(Clone, Copy)]
struct Ctx<'a> {
    entry_id: Option<&'a str>,
    action: &'static str,
    actor: &'a str,
}

impl Ctx<'_> {
    fn persistence(&self, source: StoreError) -> WorkflowError {
        match source {
            StoreError::NotFound { entity, id } => WorkflowError::NotFound { entity, id },
            source => WorkflowError::PersistenceFailure {
                entry_id: self.entry_id.map(String::from),
                action: self.action,
                actor: self.actor.to_string(),
                source,
            },
        }
    }

    fn invalid_transition(&self, entry: &DataEntry) -> WorkflowError {
        WorkflowError::InvalidTransition {
            entry_id: entry.id.clone(),
            action: self.action,
            from: entry.status,
            actor: self.actor.to_string(),
        }
    }

    fn unauthorized(&self, entry: &DataEntry) -> WorkflowError {
        WorkflowError::Unauthorized {
            entry_id: entry.id.clone(),
            action: self.action,
            actor: self.actor.to_string(),
        }
    }
}

/// Orchestrates entry creation, draft edits, and status transitions.
pub struct ApprovalWorkflow {
    ports: Collaborators,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl ApprovalWorkflow {
    #[must_use]
    pub fn new(ports: Collaborators, config: &WorkflowConfig) -> Self {
        Self {
            ports,
            request_timeout: config.request_timeout(),
            retry: RetryPolicy::from_config(config),
        }
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch one entry.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Timeout`, or `PersistenceFailure`.
    pub async fn get_entry(&self, entry_id: &str) -> Result<DataEntry, WorkflowError> {
        let ctx = Ctx {
            entry_id: Some(entry_id),
            action: "read",
            actor: "-",
        };
        self.load(entry_id, &ctx).await
    }

    /// List entries, most recently updated first.
    ///
    /// # Errors
    ///
    /// `Timeout` or `PersistenceFailure`.
    pub async fn list_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<DataEntry>, WorkflowError> {
        let ctx = Ctx {
            entry_id: None,
            action: "list",
            actor: "-",
        };
        self.call("list_entries", None, self.ports.entries.list_entries(filter))
            .await?
            .map_err(|e| ctx.persistence(e))
    }

    /// History rows of an entry, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the entry does not exist, `Timeout`, or
    /// `PersistenceFailure`.
    pub async fn history(&self, entry_id: &str) -> Result<Vec<DataHistory>, WorkflowError> {
        let ctx = Ctx {
            entry_id: Some(entry_id),
            action: "read history",
            actor: "-",
        };
        self.load(entry_id, &ctx).await?;
        self.call("history", Some(entry_id), self.ports.history.history(entry_id))
            .await?
            .map_err(|e| ctx.persistence(e))
    }

    /// Column definitions of a category, in display order.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown category, `Timeout`, or `PersistenceFailure`.
    pub async fn columns(&self, category_id: &str) -> Result<Vec<ColumnDefinition>, WorkflowError> {
        let ctx = Ctx {
            entry_id: None,
            action: "read columns",
            actor: "-",
        };
        let mut columns = self
            .call("columns_for", None, self.ports.catalog.columns_for(category_id))
            .await?
            .map_err(|e| ctx.persistence(e))?;
        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }

    /// Turn a form-style JSON object into a typed payload for `category_id`.
    ///
    /// # Errors
    ///
    /// `Validation` for unknown columns or unreadable values, plus the
    /// errors of [`Self::columns`].
    pub async fn parse_payload(
        &self,
        category_id: &str,
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<EntryPayload, WorkflowError> {
        let columns = self.columns(category_id).await?;
        EntryPayload::from_loose_json(raw, &columns)
            .map_err(|violations| WorkflowError::validation(None, "parse", violations))
    }

    // -----------------------------------------------------------------------
    // Draft operations
    // -----------------------------------------------------------------------

    /// Create a draft entry for a (category, school) pair.
    ///
    /// Values present must match their columns; required columns may still
    /// be empty. No history row is written.
    ///
    /// # Errors
    ///
    /// `Validation`, `NotFound` for an unknown category, `PersistenceFailure`
    /// (a duplicate pair surfaces as a `Conflict` source), or `Timeout`.
    pub async fn create_entry(
        &self,
        category_id: &str,
        school_id: &str,
        actor_id: &str,
        payload: EntryPayload,
    ) -> Result<DataEntry, WorkflowError> {
        let ctx = Ctx {
            entry_id: None,
            action: "create",
            actor: actor_id,
        };
        let columns = self.columns(category_id).await?;
        validate(&payload, &columns, Strictness::Draft)
            .map_err(|v| WorkflowError::validation(None, ctx.action, v))?;

        let new = NewEntry {
            category_id: category_id.to_string(),
            school_id: school_id.to_string(),
            created_by: actor_id.to_string(),
            payload,
            created_at: Utc::now(),
        };
        let entry = self
            .call("insert_entry", None, self.ports.entries.insert_entry(&new))
            .await?
            .map_err(|e| ctx.persistence(e))?;

        tracing::info!(
            entry_id = %entry.id,
            actor = actor_id,
            %category_id,
            %school_id,
            "created draft entry"
        );
        Ok(entry)
    }

    /// Replace the payload of a draft. Only the creator may edit.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if the entry left draft, `Unauthorized` for
    /// anyone but the creator, `Validation`, `NotFound`,
    /// `PersistenceFailure`, or `Timeout`.
    pub async fn update_draft(
        &self,
        entry_id: &str,
        actor_id: &str,
        payload: EntryPayload,
    ) -> Result<DataEntry, WorkflowError> {
        let ctx = Ctx {
            entry_id: Some(entry_id),
            action: "update",
            actor: actor_id,
        };
        let entry = self.load(entry_id, &ctx).await?;
        if entry.status != EntryStatus::Draft {
            return Err(ctx.invalid_transition(&entry));
        }
        if entry.created_by != actor_id {
            return Err(ctx.unauthorized(&entry));
        }
        let columns = self.columns(&entry.category_id).await?;
        validate(&payload, &columns, Strictness::Draft)
            .map_err(|v| WorkflowError::validation(Some(entry_id), ctx.action, v))?;

        let next = DataEntry {
            payload,
            version: entry.version + 1,
            updated_at: Utc::now(),
            ..entry.clone()
        };
        self.swap_with_retry(&next, entry.status, entry.version, &ctx)
            .await?;

        tracing::info!(entry_id, actor = actor_id, version = next.version, "updated draft entry");
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Submit a draft for review. Only the creator may submit, and every
    /// required column must be filled.
    ///
    /// # Errors
    ///
    /// `InvalidTransition`, `Unauthorized`, `Validation`, `NotFound`,
    /// `PersistenceFailure`, or `Timeout`.
    pub async fn submit(&self, entry_id: &str, actor_id: &str) -> Result<DataEntry, WorkflowError> {
        self.transition(entry_id, actor_id, Transition::Submit, None)
            .await
    }

    /// Approve a submitted entry, with an optional comment for the history.
    ///
    /// # Errors
    ///
    /// `InvalidTransition`, `Unauthorized`, `NotFound`, `PersistenceFailure`,
    /// or `Timeout`.
    pub async fn approve(
        &self,
        entry_id: &str,
        actor_id: &str,
        comment: Option<&str>,
    ) -> Result<DataEntry, WorkflowError> {
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        self.transition(entry_id, actor_id, Transition::Approve, comment)
            .await
    }

    /// Reject a submitted entry. The reason must contain non-whitespace text.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty reason (before anything is read), then the
    /// same errors as [`Self::approve`].
    pub async fn reject(
        &self,
        entry_id: &str,
        actor_id: &str,
        reason: &str,
    ) -> Result<DataEntry, WorkflowError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::validation(
                Some(entry_id),
                Transition::Reject.as_str(),
                vec![Violation::Invalid {
                    field: "reason".into(),
                    reason: "must not be empty".into(),
                }],
            ));
        }
        self.transition(entry_id, actor_id, Transition::Reject, Some(reason))
            .await
    }

    async fn transition(
        &self,
        entry_id: &str,
        actor_id: &str,
        transition: Transition,
        note: Option<&str>,
    ) -> Result<DataEntry, WorkflowError> {
        let ctx = Ctx {
            entry_id: Some(entry_id),
            action: transition.as_str(),
            actor: actor_id,
        };

        let entry = self.load(entry_id, &ctx).await?;
        if entry.status != transition.source() {
            return Err(ctx.invalid_transition(&entry));
        }
        self.check_capability(&entry, transition, &ctx).await?;

        let next = entry
            .transitioned(transition, actor_id, note, Utc::now())
            .map_err(|e| match e {
                CoreError::InvalidTransition { .. } => ctx.invalid_transition(&entry),
                other => ctx.persistence(StoreError::Unavailable(other.to_string())),
            })?;

        self.swap_with_retry(&next, entry.status, entry.version, &ctx)
            .await?;

        let record = NewHistory {
            entry_id: next.id.clone(),
            actor_id: actor_id.to_string(),
            previous_status: entry.status,
            status: next.status,
            payload: next.payload.clone(),
            comment: note.map(String::from),
            created_at: next.updated_at,
        };
        if let Err(err) = self.record(&record, &ctx).await {
            self.roll_back(&entry, &next, &ctx).await;
            return Err(err);
        }

        tracing::info!(
            entry_id,
            actor = actor_id,
            from = %entry.status,
            to = %next.status,
            version = next.version,
            "entry transitioned"
        );

        self.notify(&next, transition, actor_id).await;
        Ok(next)
    }

    async fn check_capability(
        &self,
        entry: &DataEntry,
        transition: Transition,
        ctx: &Ctx<'_>,
    ) -> Result<(), WorkflowError> {
        if transition.requires_approver() {
            let allowed = self
                .call(
                    "has_approval_capability",
                    ctx.entry_id,
                    self.ports
                        .authorizer
                        .has_approval_capability(ctx.actor, entry),
                )
                .await?
                .map_err(|e| ctx.persistence(e))?;
            if !allowed {
                return Err(ctx.unauthorized(entry));
            }
            return Ok(());
        }

        if entry.created_by != ctx.actor {
            return Err(ctx.unauthorized(entry));
        }
        let columns = self.columns(&entry.category_id).await?;
        validate(&entry.payload, &columns, Strictness::Submission)
            .map_err(|v| WorkflowError::validation(ctx.entry_id, ctx.action, v))
    }

    // -----------------------------------------------------------------------
    // Collaborator calls
    // -----------------------------------------------------------------------

    /// Await `fut` for at most the request timeout.
    async fn call<T>(
        &self,
        operation: &'static str,
        entry_id: Option<&str>,
        fut: impl Future<Output = T>,
    ) -> Result<T, WorkflowError> {
        tokio::time::timeout(self.request_timeout, fut)
            .await
            .map_err(|_| {
                tracing::warn!(operation, entry_id, "collaborator call timed out");
                WorkflowError::Timeout {
                    operation,
                    entry_id: entry_id.map(String::from),
                    after: self.request_timeout,
                }
            })
    }

    async fn load(&self, entry_id: &str, ctx: &Ctx<'_>) -> Result<DataEntry, WorkflowError> {
        self.call("read_entry", Some(entry_id), self.ports.entries.read_entry(entry_id))
            .await?
            .map_err(|e| ctx.persistence(e))
    }

    /// Write `target` if the stored entry is still at
    /// `(expected_status, expected_version)`.
    ///
    /// An unavailable store or a timeout is retried with backoff. Because
    /// such a failure may hide a write that did land, the entry is re-read
    /// before each retry and the write counts as applied when the stored row
    /// already equals `target`. A conflict is resolved the same way; a status
    /// that moved on becomes `InvalidTransition`.
    async fn swap_with_retry(
        &self,
        target: &DataEntry,
        expected_status: EntryStatus,
        expected_version: u32,
        ctx: &Ctx<'_>,
    ) -> Result<(), WorkflowError> {
        let mut attempt = 1;
        loop {
            let outcome = self
                .call(
                    "compare_and_swap",
                    Some(&target.id),
                    self.ports
                        .entries
                        .compare_and_swap(target, expected_status, expected_version),
                )
                .await;

            let failure = match outcome {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(StoreError::Conflict(reason))) => {
                    let stored = self.load(&target.id, ctx).await?;
                    if stored == *target {
                        return Ok(());
                    }
                    if stored.status != expected_status {
                        return Err(ctx.invalid_transition(&stored));
                    }
                    return Err(ctx.persistence(StoreError::Conflict(reason)));
                }
                Ok(Err(StoreError::Unavailable(reason))) => {
                    ctx.persistence(StoreError::Unavailable(reason))
                }
                Ok(Err(other)) => return Err(ctx.persistence(other)),
                Err(timeout) => timeout,
            };

            if !self.retry.can_retry_after(attempt) {
                tracing::error!(
                    entry_id = %target.id,
                    attempt,
                    error = %failure,
                    "giving up on entry write"
                );
                return Err(failure);
            }

            let delay = self.retry.delay_after(attempt);
            tracing::warn!(
                entry_id = %target.id,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %failure,
                "entry write failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;

            if let Ok(stored) = self.load(&target.id, ctx).await {
                if stored == *target {
                    tracing::debug!(entry_id = %target.id, "earlier write attempt had landed");
                    return Ok(());
                }
            }
        }
    }

    async fn record(
        &self,
        record: &NewHistory,
        ctx: &Ctx<'_>,
    ) -> Result<DataHistory, WorkflowError> {
        self.call(
            "insert_history",
            ctx.entry_id,
            self.ports.history.insert_history(record),
        )
        .await?
        .map_err(|e| ctx.persistence(e))
    }

    /// Put `previous` back after `applied` was written but its history row
    /// could not be. The restored row gets a fresh version so a snapshot of
    /// the undone write can never match it again.
    async fn roll_back(&self, previous: &DataEntry, applied: &DataEntry, ctx: &Ctx<'_>) {
        let restored = DataEntry {
            version: applied.version + 1,
            updated_at: Utc::now(),
            ..previous.clone()
        };
        match self
            .swap_with_retry(&restored, applied.status, applied.version, ctx)
            .await
        {
            Ok(()) => tracing::warn!(
                entry_id = %previous.id,
                status = %previous.status,
                "history insert failed, entry rolled back"
            ),
            Err(err) => tracing::error!(
                entry_id = %previous.id,
                stuck_at = %applied.status,
                error = %err,
                "history insert failed and rollback failed"
            ),
        }
    }

    /// Best-effort delivery under one deadline for the whole phase.
    /// Failures are logged and never undo the transition.
    async fn notify(&self, entry: &DataEntry, transition: Transition, actor_id: &str) {
        let delivery = self.deliver(entry, transition, actor_id);
        if tokio::time::timeout(self.request_timeout, delivery)
            .await
            .is_err()
        {
            tracing::warn!(
                entry_id = %entry.id,
                after_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
                "notification delivery cut short"
            );
        }
    }

    async fn deliver(&self, entry: &DataEntry, transition: Transition, actor_id: &str) {
        let approvers = if transition == Transition::Submit {
            match self.ports.authorizer.approvers_for(entry).await {
                Ok(approvers) => approvers,
                Err(error) => {
                    tracing::warn!(entry_id = %entry.id, %error, "could not resolve approvers");
                    return;
                }
            }
        } else {
            Vec::new()
        };

        for notification in transition_notifications(entry, transition, actor_id, &approvers) {
            match self.ports.notifier.send(&notification).await {
                Ok(()) => tracing::debug!(
                    entry_id = %entry.id,
                    recipient = %notification.recipient_id,
                    "notification sent"
                ),
                Err(error) => tracing::warn!(
                    entry_id = %entry.id,
                    recipient = %notification.recipient_id,
                    %error,
                    "notification not delivered"
                ),
            }
        }
    }
}
