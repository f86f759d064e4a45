use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `grid` binary.
#[derive(Debug, Parser)]
#[command(name = "grid", version, about = "Schoolgrid - school data entry and approval")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .schoolgrid)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// User ID performing the command
    #[arg(short, long, global = true)]
    pub actor: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            actor: self.actor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{EntryCommands, RoleCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "grid",
            "--format",
            "raw",
            "--limit",
            "10",
            "--actor",
            "usr-a",
            "entry",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert_eq!(cli.actor.as_deref(), Some("usr-a"));
        assert!(matches!(
            cli.command,
            Commands::Entry {
                action: EntryCommands::List { .. }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "grid", "entry", "submit", "ent-1", "--actor", "usr-a", "--quiet",
        ])
        .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.global_flags().actor.as_deref(), Some("usr-a"));
        match cli.command {
            Commands::Entry {
                action: EntryCommands::Submit { id },
            } => assert_eq!(id, "ent-1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn reject_requires_reason() {
        let parsed = Cli::try_parse_from(["grid", "entry", "reject", "ent-1"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "grid", "entry", "reject", "ent-1", "--reason", "incomplete",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Entry {
                action: EntryCommands::Reject { .. }
            }
        ));
    }

    #[test]
    fn role_grant_parses_scope() {
        let cli = Cli::try_parse_from([
            "grid", "role", "grant", "usr-r", "--role", "regionadmin", "--region", "reg-1",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Role {
                action: RoleCommands::Grant { user, role, region, .. },
            } => {
                assert_eq!(user, "usr-r");
                assert_eq!(role, "regionadmin");
                assert_eq!(region.as_deref(), Some("reg-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["grid", "--format", "xml", "entry", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["grid", "--project", "/tmp/demo", "entry", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
        assert!(flags.actor.is_none());
    }
}
