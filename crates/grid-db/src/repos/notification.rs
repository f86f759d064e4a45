//! Notification outbox repository.
//!
//! Transitions enqueue rows here; users read them from their inbox.

use chrono::Utc;

use grid_core::entities::{InboxItem, Notification};
use grid_core::ids::PREFIX_NOTIFICATION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_text, parse_datetime};
use crate::service::GridService;

impl GridService {
    pub async fn enqueue_notification(
        &self,
        notification: &Notification,
    ) -> Result<InboxItem, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_NOTIFICATION).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO notifications
                    (id, recipient_id, title, message, link, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
                libsql::params![
                    id.as_str(),
                    notification.recipient_id.as_str(),
                    notification.title.as_str(),
                    notification.message.as_str(),
                    opt_text(notification.link.as_deref()),
                    now.to_rfc3339()
                ],
            )
            .await?;
        Ok(InboxItem {
            id,
            notification: notification.clone(),
            is_read: false,
            created_at: now,
        })
    }

    /// A user's notifications, newest first.
    pub async fn list_notifications(
        &self,
        recipient_id: &str,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<InboxItem>, DatabaseError> {
        let unread = if unread_only { "AND is_read = 0" } else { "" };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT id, recipient_id, title, message, link, is_read, created_at
                     FROM notifications WHERE recipient_id = ?1 {unread}
                     ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                ),
                [recipient_id],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(InboxItem {
                id: row.get(0)?,
                notification: Notification {
                    recipient_id: row.get(1)?,
                    title: row.get(2)?,
                    message: row.get(3)?,
                    link: get_opt_string(&row, 4)?,
                },
                is_read: row.get::<i64>(5)? != 0,
                created_at: parse_datetime(&row.get::<String>(6)?)?,
            });
        }
        Ok(items)
    }

    /// Mark one notification read. Only the recipient may do so.
    pub async fn mark_notification_read(
        &self,
        recipient_id: &str,
        id: &str,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND recipient_id = ?2",
                libsql::params![id, recipient_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn enqueue_and_read_inbox() {
        let svc = test_service().await;
        let first = svc
            .enqueue_notification(&Notification::new("usr-a", "One", "first", None))
            .await
            .unwrap();
        svc.enqueue_notification(&Notification::new("usr-a", "Two", "second", Some("/x".into())))
            .await
            .unwrap();
        svc.enqueue_notification(&Notification::new("usr-b", "Other", "not yours", None))
            .await
            .unwrap();

        let inbox = svc.list_notifications("usr-a", false, 10).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].notification.title, "Two");

        svc.mark_notification_read("usr-a", &first.id).await.unwrap();
        let unread = svc.list_notifications("usr-a", true, 10).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].notification.title, "Two");
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let svc = test_service().await;
        let item = svc
            .enqueue_notification(&Notification::new("usr-a", "One", "first", None))
            .await
            .unwrap();
        let result = svc.mark_notification_read("usr-b", &item.id).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }
}
