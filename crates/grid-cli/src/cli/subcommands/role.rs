use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum RoleCommands {
    /// Grant a role to a user.
    Grant {
        user: String,
        /// superadmin, regionadmin, sectoradmin, schooladmin
        #[arg(long)]
        role: String,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        school: Option<String>,
    },
    /// List a user's roles.
    List { user: String },
}
