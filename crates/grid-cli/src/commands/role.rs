use anyhow::Context;
use grid_core::entities::UserRole;
use grid_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RoleCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &RoleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RoleCommands::Grant {
            user,
            role,
            region,
            sector,
            school,
        } => {
            let role: Role = parse_enum(role, "role")?;
            let grant = UserRole {
                user_id: user.clone(),
                role,
                region_id: region.clone(),
                sector_id: sector.clone(),
                school_id: school.clone(),
            };
            ctx.service
                .grant_role(&grant)
                .await
                .with_context(|| format!("failed to grant {role} to '{user}'"))?;
            output(&grant, flags.format)
        }
        RoleCommands::List { user } => {
            let roles = ctx
                .service
                .roles_for(user)
                .await
                .with_context(|| format!("failed to list roles of '{user}'"))?;
            output(&roles, flags.format)
        }
    }
}
