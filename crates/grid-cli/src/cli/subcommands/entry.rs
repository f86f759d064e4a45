use clap::Subcommand;

/// Data entry commands. Mutations need the global `--actor`.
#[derive(Clone, Debug, Subcommand)]
pub enum EntryCommands {
    /// Create a draft entry.
    Create {
        #[arg(long)]
        category: String,
        #[arg(long)]
        school: String,
        /// JSON object of column ID to value.
        #[arg(long, default_value = "{}")]
        values: String,
    },
    /// Get an entry by ID.
    Get { id: String },
    /// List entries.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        school: Option<String>,
        /// draft, submitted, approved, rejected
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        created_by: Option<String>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Replace the values of a draft.
    Update {
        id: String,
        #[arg(long)]
        values: String,
    },
    /// Submit a draft for review.
    Submit { id: String },
    /// Approve a submitted entry.
    Approve {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject a submitted entry.
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Show an entry's history, newest first.
    History { id: String },
}
