use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A message queued for a user after an entry transition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Notification {
    pub recipient_id: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn new(
        recipient_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        link: Option<String>,
    ) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            title: title.into(),
            message: message.into(),
            link,
        }
    }
}

/// A delivered notification as stored in a user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InboxItem {
    pub id: String,
    #[serde(flatten)]
    pub notification: Notification,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
