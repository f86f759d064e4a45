//! Transition notifications and a channel-backed notifier.

use async_trait::async_trait;
use tokio::sync::mpsc;

use grid_core::entities::{DataEntry, Notification};
use grid_core::enums::Transition;
use grid_core::errors::NotifyError;
use grid_core::ports::Notifier;

/// Link to an entry, as shown in a notification.
#[must_use]
pub fn entry_link(entry_id: &str) -> String {
    format!("/entries/{entry_id}")
}

/// Notifications for `entry` right after `transition`.
///
/// A submission goes to every approver except the submitter; an approval or
/// rejection goes to the entry's creator.
#[must_use]
pub fn transition_notifications(
    entry: &DataEntry,
    transition: Transition,
    actor_id: &str,
    approvers: &[String],
) -> Vec<Notification> {
    let link = Some(entry_link(&entry.id));
    match transition {
        Transition::Submit => approvers
            .iter()
            .filter(|approver| approver.as_str() != actor_id)
            .map(|approver| {
                Notification::new(
                    approver.as_str(),
                    "Entry submitted for review",
                    format!(
                        "Entry {} for school {} was submitted by {actor_id}.",
                        entry.id, entry.school_id
                    ),
                    link.clone(),
                )
            })
            .collect(),
        Transition::Approve => vec![Notification::new(
            entry.created_by.as_str(),
            "Entry approved",
            format!("Entry {} was approved by {actor_id}.", entry.id),
            link,
        )],
        Transition::Reject => {
            let reason = entry.rejection_reason.as_deref().unwrap_or_default();
            vec![Notification::new(
                entry.created_by.as_str(),
                "Entry rejected",
                format!("Entry {} was rejected by {actor_id}: {reason}", entry.id),
                link,
            )]
        }
    }
}

/// Pushes notifications onto a bounded tokio channel without waiting.
///
/// A full or closed channel is reported as a delivery failure.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.tx
            .try_send(notification.clone())
            .map_err(|e| NotifyError {
                recipient_id: notification.recipient_id.clone(),
                reason: match e {
                    mpsc::error::TrySendError::Full(_) => "outbound queue is full".into(),
                    mpsc::error::TrySendError::Closed(_) => "outbound queue is closed".into(),
                },
            })
    }
}
