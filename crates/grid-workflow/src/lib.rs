//! # grid-workflow
//!
//! Approval workflow for Schoolgrid data entries.
//!
//! [`ApprovalWorkflow`] guards the draft → submitted → approved/rejected
//! state machine, writes one history row per transition, and dispatches
//! notifications. It only sees the `grid-core` ports, so it runs unchanged
//! against `grid-db` or the in-memory collaborators in [`memory`].

pub mod error;
pub mod memory;
pub mod notify;
pub mod retry;
pub mod workflow;

pub use error::WorkflowError;
pub use notify::ChannelNotifier;
pub use retry::RetryPolicy;
pub use workflow::{ApprovalWorkflow, Collaborators};
