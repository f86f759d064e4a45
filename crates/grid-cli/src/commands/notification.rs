use anyhow::Context;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::NotificationCommands;
use crate::commands::shared::actor::require_actor;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Inbox commands act on the `--actor`'s own notifications.
pub async fn handle(
    action: &NotificationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let recipient = require_actor(flags)?;
    match action {
        NotificationCommands::List { unread } => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let items = ctx
                .service
                .list_notifications(recipient, *unread, limit)
                .await
                .context("failed to list notifications")?;
            output(&items, flags.format)
        }
        NotificationCommands::Read { id } => {
            ctx.service
                .mark_notification_read(recipient, id)
                .await
                .with_context(|| format!("failed to mark notification '{id}' read"))?;
            output(&json!({ "id": id, "read": true }), flags.format)
        }
    }
}
