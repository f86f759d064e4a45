use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum RegionCommands {
    /// Add a region.
    Add { name: String },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SectorCommands {
    /// Add a sector to a region.
    Add {
        name: String,
        #[arg(long)]
        region: String,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SchoolCommands {
    /// Add a school to a sector.
    Add {
        name: String,
        #[arg(long)]
        sector: String,
    },
    /// List schools.
    List {
        #[arg(long)]
        sector: Option<String>,
    },
}
