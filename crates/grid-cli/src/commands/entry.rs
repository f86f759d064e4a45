use anyhow::Context;
use grid_core::enums::EntryStatus;
use grid_core::ports::EntryFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EntryCommands;
use crate::commands::shared::actor::require_actor;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_values};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &EntryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let workflow = &ctx.workflow;
    match action {
        EntryCommands::Create {
            category,
            school,
            values,
        } => {
            let actor = require_actor(flags)?;
            let payload = workflow.parse_payload(category, &parse_values(values)?).await?;
            let entry = workflow
                .create_entry(category, school, actor, payload)
                .await
                .context("failed to create entry")?;
            output(&entry, flags.format)
        }
        EntryCommands::Get { id } => {
            let entry = workflow.get_entry(id).await?;
            output(&entry, flags.format)
        }
        EntryCommands::List {
            category,
            school,
            status,
            created_by,
            offset,
        } => {
            let status = status
                .as_deref()
                .map(|raw| parse_enum::<EntryStatus>(raw, "status"))
                .transpose()?;
            let filter = EntryFilter {
                category_id: category.clone(),
                school_id: school.clone(),
                status,
                created_by: created_by.clone(),
                limit: Some(effective_limit(
                    None,
                    flags.limit,
                    ctx.config.general.default_limit,
                )),
                offset: *offset,
            };
            let entries = workflow
                .list_entries(&filter)
                .await
                .context("failed to list entries")?;
            output(&entries, flags.format)
        }
        EntryCommands::Update { id, values } => {
            let actor = require_actor(flags)?;
            let current = workflow.get_entry(id).await?;
            let payload = workflow
                .parse_payload(&current.category_id, &parse_values(values)?)
                .await?;
            let entry = workflow.update_draft(id, actor, payload).await?;
            output(&entry, flags.format)
        }
        EntryCommands::Submit { id } => {
            let actor = require_actor(flags)?;
            let entry = workflow.submit(id, actor).await?;
            output(&entry, flags.format)
        }
        EntryCommands::Approve { id, comment } => {
            let actor = require_actor(flags)?;
            let entry = workflow.approve(id, actor, comment.as_deref()).await?;
            output(&entry, flags.format)
        }
        EntryCommands::Reject { id, reason } => {
            let actor = require_actor(flags)?;
            let entry = workflow.reject(id, actor, reason).await?;
            output(&entry, flags.format)
        }
        EntryCommands::History { id } => {
            let history = workflow.history(id).await?;
            output(&history, flags.format)
        }
    }
}
