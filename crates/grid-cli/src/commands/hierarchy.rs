use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{RegionCommands, SchoolCommands, SectorCommands};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle_region(
    action: &RegionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RegionCommands::Add { name } => {
            let region = ctx
                .service
                .create_region(name)
                .await
                .context("failed to create region")?;
            output(&region, flags.format)
        }
    }
}

pub async fn handle_sector(
    action: &SectorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SectorCommands::Add { name, region } => {
            let sector = ctx
                .service
                .create_sector(region, name)
                .await
                .with_context(|| format!("failed to create sector in region '{region}'"))?;
            output(&sector, flags.format)
        }
    }
}

pub async fn handle_school(
    action: &SchoolCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SchoolCommands::Add { name, sector } => {
            let school = ctx
                .service
                .create_school(sector, name)
                .await
                .with_context(|| format!("failed to create school in sector '{sector}'"))?;
            output(&school, flags.format)
        }
        SchoolCommands::List { sector } => {
            let schools = ctx
                .service
                .list_schools(sector.as_deref())
                .await
                .context("failed to list schools")?;
            output(&schools, flags.format)
        }
    }
}
