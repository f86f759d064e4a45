//! Cross-cutting error types for Schoolgrid.
//!
//! `CoreError` covers failures that can originate from any crate. `StoreError`
//! and `NotifyError` are the error types of the collaborator ports in
//! [`crate::ports`]; persistence crates convert their own errors into them.
//! The workflow crate defines `WorkflowError` on top of these.

use thiserror::Error;

use crate::payload::Violation;

/// Errors that can be raised by any Schoolgrid crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Payload failed validation against column definitions.
    #[error("Validation error: {}", format_violations(.0))]
    Validation(Vec<Violation>),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors returned by persistence ports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A conditional write found the row in a different state than expected,
    /// or a uniqueness constraint rejected an insert.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// The store could not be reached or the statement failed.
    ///
    /// Whether the write took effect is unknown.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by the notification port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification to {recipient_id} not delivered: {reason}")]
pub struct NotifyError {
    pub recipient_id: String,
    pub reason: String,
}

/// Join violations into a single `; `-separated message.
#[must_use]
pub fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
