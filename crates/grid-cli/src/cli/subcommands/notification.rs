use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum NotificationCommands {
    /// List the actor's notifications.
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification read.
    Read { id: String },
}
