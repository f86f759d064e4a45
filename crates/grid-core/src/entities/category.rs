use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ColumnKind;

/// A data-entry form that schools fill in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A single field of a category.
///
/// `options` is only meaningful for `ColumnKind::Select`; `min`/`max` only for
/// `ColumnKind::Number`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ColumnDefinition {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub kind: ColumnKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub position: u32,
}
