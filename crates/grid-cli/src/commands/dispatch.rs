use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Region { action } => {
            commands::hierarchy::handle_region(&action, ctx, flags).await
        }
        Commands::Sector { action } => {
            commands::hierarchy::handle_sector(&action, ctx, flags).await
        }
        Commands::School { action } => {
            commands::hierarchy::handle_school(&action, ctx, flags).await
        }
        Commands::Category { action } => {
            commands::catalog::handle_category(&action, ctx, flags).await
        }
        Commands::Column { action } => commands::catalog::handle_column(&action, ctx, flags).await,
        Commands::Role { action } => commands::role::handle(&action, ctx, flags).await,
        Commands::Entry { action } => commands::entry::handle(&action, ctx, flags).await,
        Commands::Notification { action } => {
            commands::notification::handle(&action, ctx, flags).await
        }
        Commands::Init(_) => anyhow::bail!("init is handled before the project context is opened"),
    }
}
