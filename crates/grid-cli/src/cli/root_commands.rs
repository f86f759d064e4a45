use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CategoryCommands, ColumnCommands, EntryCommands, NotificationCommands, RegionCommands,
    RoleCommands, SchoolCommands, SectorCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize schoolgrid in a directory.
    Init(InitArgs),
    /// Regions.
    Region {
        #[command(subcommand)]
        action: RegionCommands,
    },
    /// Sectors within a region.
    Sector {
        #[command(subcommand)]
        action: SectorCommands,
    },
    /// Schools within a sector.
    School {
        #[command(subcommand)]
        action: SchoolCommands,
    },
    /// Data-entry categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Columns of a category.
    Column {
        #[command(subcommand)]
        action: ColumnCommands,
    },
    /// Role grants.
    Role {
        #[command(subcommand)]
        action: RoleCommands,
    },
    /// Data entries and their approval workflow.
    Entry {
        #[command(subcommand)]
        action: EntryCommands,
    },
    /// Notification inbox.
    Notification {
        #[command(subcommand)]
        action: NotificationCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory).
    pub path: Option<String>,
}
