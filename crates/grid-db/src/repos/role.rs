//! Role grant repository and approver scope resolution.
//!
//! A user can approve entries of a school when they hold a role whose scope
//! covers it: superadmin everywhere, regionadmin in their region,
//! sectoradmin in their sector. School admins never approve.

use grid_core::entities::UserRole;
use grid_core::enums::Role;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_text, parse_enum};
use crate::service::GridService;

/// Roles covering a school, given `?1` = region ID and `?2` = sector ID.
const APPROVER_SCOPE: &str = "(role = 'superadmin'
      OR (role = 'regionadmin' AND region_id = ?1)
      OR (role = 'sectoradmin' AND sector_id = ?2))";

impl GridService {
    /// Record a role grant.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the scope columns do not match
    /// the role (e.g. a sector admin without `sector_id`).
    pub async fn grant_role(&self, grant: &UserRole) -> Result<(), DatabaseError> {
        let scoped = match grant.role {
            Role::Superadmin => {
                grant.region_id.is_none() && grant.sector_id.is_none() && grant.school_id.is_none()
            }
            Role::Regionadmin => grant.region_id.is_some(),
            Role::Sectoradmin => grant.sector_id.is_some(),
            Role::Schooladmin => grant.school_id.is_some(),
        };
        if !scoped {
            return Err(DatabaseError::InvalidState(format!(
                "{} grant for {} has the wrong scope",
                grant.role, grant.user_id
            )));
        }

        self.db()
            .conn()
            .execute(
                "INSERT OR IGNORE INTO user_roles (user_id, role, region_id, sector_id, school_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    grant.user_id.as_str(),
                    grant.role.as_str(),
                    opt_text(grant.region_id.as_deref()),
                    opt_text(grant.sector_id.as_deref()),
                    opt_text(grant.school_id.as_deref())
                ],
            )
            .await?;
        tracing::info!(user_id = %grant.user_id, role = %grant.role, "granted role");
        Ok(())
    }

    pub async fn roles_for(&self, user_id: &str) -> Result<Vec<UserRole>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT user_id, role, region_id, sector_id, school_id
                 FROM user_roles WHERE user_id = ?1 ORDER BY created_at, role",
                [user_id],
            )
            .await?;

        let mut roles = Vec::new();
        while let Some(row) = rows.next().await? {
            roles.push(UserRole {
                user_id: row.get(0)?,
                role: parse_enum(&row.get::<String>(1)?)?,
                region_id: get_opt_string(&row, 2)?,
                sector_id: get_opt_string(&row, 3)?,
                school_id: get_opt_string(&row, 4)?,
            });
        }
        Ok(roles)
    }

    /// Whether `user_id` holds a role that covers `school_id`.
    pub async fn can_approve_school(
        &self,
        user_id: &str,
        school_id: &str,
    ) -> Result<bool, DatabaseError> {
        let school = self.get_school(school_id).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT 1 FROM user_roles
                     WHERE user_id = ?3 AND {APPROVER_SCOPE} LIMIT 1"
                ),
                libsql::params![school.region_id.as_str(), school.sector_id.as_str(), user_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Every user whose role covers `school_id`, sorted by ID.
    pub async fn approvers_for_school(
        &self,
        school_id: &str,
    ) -> Result<Vec<String>, DatabaseError> {
        let school = self.get_school(school_id).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT DISTINCT user_id FROM user_roles
                     WHERE {APPROVER_SCOPE} ORDER BY user_id"
                ),
                libsql::params![school.region_id.as_str(), school.sector_id.as_str()],
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row.get::<String>(0)?);
        }
        Ok(users)
    }
}
