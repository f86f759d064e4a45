use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// A role grant. The scope columns that apply depend on the role:
/// region admins carry `region_id`, sector admins `sector_id`, school
/// admins `school_id`, super admins none.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserRole {
    pub user_id: String,
    pub role: Role,
    pub region_id: Option<String>,
    pub sector_id: Option<String>,
    pub school_id: Option<String>,
}
