use crate::cli::GlobalFlags;

/// The `--actor` value, required by commands that act on someone's behalf.
pub fn require_actor(flags: &GlobalFlags) -> anyhow::Result<&str> {
    match flags.actor.as_deref().map(str::trim) {
        Some(actor) if !actor.is_empty() => Ok(actor),
        _ => anyhow::bail!("this command needs --actor <user-id>"),
    }
}
