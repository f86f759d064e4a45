use anyhow::Context;
use grid_core::enums::ColumnKind;
use grid_db::repos::catalog::ColumnSpec;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{CategoryCommands, ColumnCommands};
use crate::commands::shared::parse::{parse_deadline, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle_category(
    action: &CategoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CategoryCommands::Add {
            name,
            description,
            deadline,
        } => {
            let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
            let category = ctx
                .service
                .create_category(name, description.as_deref(), deadline)
                .await
                .context("failed to create category")?;
            output(&category, flags.format)
        }
        CategoryCommands::List { all } => {
            let categories = ctx
                .service
                .list_categories(!all)
                .await
                .context("failed to list categories")?;
            output(&categories, flags.format)
        }
        CategoryCommands::Deactivate { id } => {
            let category = ctx
                .service
                .set_category_active(id, false)
                .await
                .with_context(|| format!("failed to deactivate category '{id}'"))?;
            output(&category, flags.format)
        }
    }
}

pub async fn handle_column(
    action: &ColumnCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ColumnCommands::Add {
            name,
            category,
            kind,
            required,
            options,
            min,
            max,
        } => {
            let kind: ColumnKind = parse_enum(kind, "kind")?;
            let mut spec = ColumnSpec::new(name.clone(), kind)
                .options(options.clone())
                .range(*min, *max);
            if *required {
                spec = spec.required();
            }
            let column = ctx
                .service
                .add_column(category, &spec)
                .await
                .with_context(|| format!("failed to add column to category '{category}'"))?;
            output(&column, flags.format)
        }
        ColumnCommands::List { category } => {
            let columns = ctx
                .workflow
                .columns(category)
                .await
                .with_context(|| format!("failed to list columns of category '{category}'"))?;
            output(&columns, flags.format)
        }
    }
}
