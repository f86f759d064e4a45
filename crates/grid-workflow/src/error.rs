//! Workflow error type.

use std::time::Duration;

use grid_core::enums::EntryStatus;
use grid_core::errors::{StoreError, format_violations};
use grid_core::payload::Violation;
use thiserror::Error;

/// Errors returned by [`crate::ApprovalWorkflow`].
///
/// `action` is the attempted operation: a transition name (`submit`,
/// `approve`, `reject`) or a draft operation (`create`, `update`).
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The entry is not in the status the action requires.
    #[error("cannot {action} entry {entry_id} as {actor}: entry is {from}")]
    InvalidTransition {
        entry_id: String,
        action: &'static str,
        from: EntryStatus,
        actor: String,
    },

    /// The actor lacks the capability the action requires.
    #[error("{actor} is not allowed to {action} entry {entry_id}")]
    Unauthorized {
        entry_id: String,
        action: &'static str,
        actor: String,
    },

    /// The payload or a transition argument is malformed.
    #[error(
        "invalid {action}{}: {}",
        fmt_entry(.entry_id.as_deref()),
        format_violations(.violations)
    )]
    Validation {
        entry_id: Option<String>,
        action: &'static str,
        violations: Vec<Violation>,
    },

    /// A store rejected or failed the write.
    #[error("{action}{} by {actor} failed: {source}", fmt_entry(.entry_id.as_deref()))]
    PersistenceFailure {
        entry_id: Option<String>,
        action: &'static str,
        actor: String,
        #[source]
        source: StoreError,
    },

    /// A collaborator did not answer in time.
    #[error(
        "{operation}{} timed out after {}ms",
        fmt_entry(.entry_id.as_deref()),
        .after.as_millis()
    )]
    Timeout {
        operation: &'static str,
        entry_id: Option<String>,
        after: Duration,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

fn fmt_entry(entry_id: Option<&str>) -> String {
    entry_id.map_or_else(String::new, |id| format!(" of entry {id}"))
}

impl WorkflowError {
    /// Whether retrying the same request could succeed.
    ///
    /// Only unavailable stores and timeouts qualify; every other kind
    /// depends on state or input that a retry does not change.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::PersistenceFailure {
                    source: StoreError::Unavailable(_),
                    ..
                }
        )
    }

    pub(crate) fn validation(
        entry_id: Option<&str>,
        action: &'static str,
        violations: Vec<Violation>,
    ) -> Self {
        Self::Validation {
            entry_id: entry_id.map(String::from),
            action,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_entry_action_and_actor() {
        let err = WorkflowError::InvalidTransition {
            entry_id: "ent-00000001".into(),
            action: "submit",
            from: EntryStatus::Approved,
            actor: "usr-a".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot submit entry ent-00000001 as usr-a: entry is approved"
        );

        let err = WorkflowError::validation(
            Some("ent-00000001"),
            "reject",
            vec![Violation::Invalid {
                field: "reason".into(),
                reason: "must not be empty".into(),
            }],
        );
        assert_eq!(
            err.to_string(),
            "invalid reject of entry ent-00000001: reason: must not be empty"
        );
    }

    #[test]
    fn only_unavailable_and_timeout_are_transient() {
        let unavailable = WorkflowError::PersistenceFailure {
            entry_id: None,
            action: "create",
            actor: "usr-a".into(),
            source: StoreError::Unavailable("down".into()),
        };
        let conflict = WorkflowError::PersistenceFailure {
            entry_id: None,
            action: "create",
            actor: "usr-a".into(),
            source: StoreError::Conflict("duplicate".into()),
        };
        let timeout = WorkflowError::Timeout {
            operation: "read_entry",
            entry_id: Some("ent-00000001".into()),
            after: Duration::from_millis(10),
        };
        assert!(unavailable.is_transient());
        assert!(timeout.is_transient());
        assert!(!conflict.is_transient());
    }
}
