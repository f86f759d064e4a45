use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntryStatus;
use crate::payload::EntryPayload;

/// Immutable snapshot of a data entry taken at the moment of a transition.
///
/// Rows are append-only: never updated, never deleted, never moved to
/// another entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DataHistory {
    pub id: String,
    pub entry_id: String,
    pub actor_id: String,
    pub previous_status: EntryStatus,
    pub status: EntryStatus,
    pub payload: EntryPayload,
    /// Approval comment or rejection reason.
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
