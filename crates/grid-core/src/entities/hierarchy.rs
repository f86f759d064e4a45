use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Top level of the administrative hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A group of schools inside a region.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Sector {
    pub id: String,
    pub region_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A school. Data entries are always submitted on behalf of one school.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct School {
    pub id: String,
    pub sector_id: String,
    pub region_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
