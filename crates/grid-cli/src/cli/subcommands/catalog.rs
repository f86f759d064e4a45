use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    /// Add a category.
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Submission deadline (RFC 3339 or YYYY-MM-DD).
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List categories.
    List {
        /// Include deactivated categories.
        #[arg(long)]
        all: bool,
    },
    /// Deactivate a category.
    Deactivate { id: String },
}

#[derive(Clone, Debug, Subcommand)]
pub enum ColumnCommands {
    /// Append a column to a category.
    Add {
        name: String,
        #[arg(long)]
        category: String,
        /// text, number, date, select
        #[arg(long)]
        kind: String,
        #[arg(long)]
        required: bool,
        /// Allowed values of a select column (repeatable).
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
    },
    /// List the columns of a category.
    List { category: String },
}
