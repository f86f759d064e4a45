use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::{AppContext, PROJECT_DIR, database_path};
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    database: String,
}

/// Handle `grid init`: create `.schoolgrid/` and the database schema.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match args.path.as_deref().or(flags.project.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    std::fs::create_dir_all(root.join(PROJECT_DIR))
        .with_context(|| format!("failed to create {}", root.join(PROJECT_DIR).display()))?;

    let config = grid_config::GridConfig::load_with_dotenv(&root)
        .context("failed to load schoolgrid configuration")?;
    let database = database_path(&root, &config);
    AppContext::init(&root, config).await?;

    tracing::info!(root = %root.display(), "initialized schoolgrid project");
    output(
        &InitResponse {
            project_root: root.display().to_string(),
            database: database.display().to_string(),
        },
        flags.format,
    )
}
