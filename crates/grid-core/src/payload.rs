//! Typed entry payloads and validation against column definitions.
//!
//! A payload is an ordered map from column ID to a [`FieldValue`]. Validation
//! runs in two strictness levels: drafts may be incomplete, submissions must
//! carry every required column.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ColumnDefinition;
use crate::enums::ColumnKind;

/// A single typed value in an entry payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Select(String),
}

impl FieldValue {
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::Number(_) => ColumnKind::Number,
            Self::Date(_) => ColumnKind::Date,
            Self::Select(_) => ColumnKind::Select,
        }
    }

    /// Whether the value counts as "not filled in" for required columns.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) | Self::Select(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Select(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Column ID → value map for one data entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct EntryPayload(BTreeMap<String, FieldValue>);

impl EntryPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column_id: impl Into<String>, value: FieldValue) -> Self {
        self.0.insert(column_id.into(), value);
        self
    }

    pub fn insert(
        &mut self,
        column_id: impl Into<String>,
        value: FieldValue,
    ) -> Option<FieldValue> {
        self.0.insert(column_id.into(), value)
    }

    #[must_use]
    pub fn get(&self, column_id: &str) -> Option<&FieldValue> {
        self.0.get(column_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Convert a loosely typed JSON object (as entered in a form) into a typed
    /// payload, using each column's declared kind.
    ///
    /// Numbers may be given as JSON numbers or numeric strings; dates as
    /// `YYYY-MM-DD` strings. `null` values are dropped.
    ///
    /// # Errors
    ///
    /// Returns every violation found: unknown columns and values that cannot
    /// be read as the column's kind.
    pub fn from_loose_json(
        raw: &serde_json::Map<String, serde_json::Value>,
        columns: &[ColumnDefinition],
    ) -> Result<Self, Vec<Violation>> {
        let by_id: BTreeMap<&str, &ColumnDefinition> =
            columns.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut payload = Self::new();
        let mut violations = Vec::new();

        for (column_id, value) in raw {
            let Some(column) = by_id.get(column_id.as_str()) else {
                violations.push(Violation::UnknownColumn {
                    column_id: column_id.clone(),
                });
                continue;
            };
            if value.is_null() {
                continue;
            }
            match coerce(column.kind, value) {
                Some(v) => {
                    payload.insert(column_id.clone(), v);
                }
                None => violations.push(Violation::KindMismatch {
                    column_id: column_id.clone(),
                    expected: column.kind,
                    found: value.to_string(),
                }),
            }
        }

        if violations.is_empty() {
            Ok(payload)
        } else {
            Err(violations)
        }
    }
}

fn coerce(kind: ColumnKind, value: &serde_json::Value) -> Option<FieldValue> {
    match (kind, value) {
        (ColumnKind::Text, serde_json::Value::String(s)) => Some(FieldValue::Text(s.clone())),
        (ColumnKind::Select, serde_json::Value::String(s)) => Some(FieldValue::Select(s.clone())),
        (ColumnKind::Number, serde_json::Value::Number(n)) => n.as_f64().map(FieldValue::Number),
        (ColumnKind::Number, serde_json::Value::String(s)) => {
            s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(FieldValue::Number)
        }
        (ColumnKind::Date, serde_json::Value::String(s)) => {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(FieldValue::Date)
        }
        _ => None,
    }
}

/// How strictly a payload is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Values present must be well-formed; required columns may be missing.
    Draft,
    /// Additionally every required column must hold a non-blank value.
    Submission,
}

/// A single reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    UnknownColumn {
        column_id: String,
    },
    KindMismatch {
        column_id: String,
        expected: ColumnKind,
        found: String,
    },
    MissingRequired {
        column_id: String,
        name: String,
    },
    NotAnOption {
        column_id: String,
        value: String,
    },
    OutOfRange {
        column_id: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Free-form violation (e.g. an empty rejection reason).
    Invalid {
        field: String,
        reason: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn { column_id } => write!(f, "unknown column '{column_id}'"),
            Self::KindMismatch {
                column_id,
                expected,
                found,
            } => write!(f, "column '{column_id}' expects {expected}, got {found}"),
            Self::MissingRequired { column_id, name } => {
                write!(f, "required column '{name}' ({column_id}) is empty")
            }
            Self::NotAnOption { column_id, value } => {
                write!(f, "'{value}' is not an option of column '{column_id}'")
            }
            Self::OutOfRange {
                column_id,
                value,
                min,
                max,
            } => {
                let lo = min.map_or_else(|| "-inf".to_string(), |m| m.to_string());
                let hi = max.map_or_else(|| "inf".to_string(), |m| m.to_string());
                write!(f, "column '{column_id}' value {value} outside [{lo}, {hi}]")
            }
            Self::Invalid { field, reason } => write!(f, "{field}: {reason}"),
        }
    }
}

/// Validate `payload` against the category's `columns`.
///
/// # Errors
///
/// Returns every violation found, in column order followed by unknown columns.
pub fn validate(
    payload: &EntryPayload,
    columns: &[ColumnDefinition],
    strictness: Strictness,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let mut ordered: Vec<&ColumnDefinition> = columns.iter().collect();
    ordered.sort_by_key(|c| c.position);

    for column in ordered {
        match payload.get(&column.id) {
            None => {
                if strictness == Strictness::Submission && column.required {
                    violations.push(Violation::MissingRequired {
                        column_id: column.id.clone(),
                        name: column.name.clone(),
                    });
                }
            }
            Some(value) => check_value(column, value, strictness, &mut violations),
        }
    }

    for (column_id, _) in payload.iter() {
        if !columns.iter().any(|c| &c.id == column_id) {
            violations.push(Violation::UnknownColumn {
                column_id: column_id.clone(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_value(
    column: &ColumnDefinition,
    value: &FieldValue,
    strictness: Strictness,
    violations: &mut Vec<Violation>,
) {
    if value.kind() != column.kind {
        violations.push(Violation::KindMismatch {
            column_id: column.id.clone(),
            expected: column.kind,
            found: value.kind().to_string(),
        });
        return;
    }

    if value.is_blank() {
        if strictness == Strictness::Submission && column.required {
            violations.push(Violation::MissingRequired {
                column_id: column.id.clone(),
                name: column.name.clone(),
            });
        }
        return;
    }

    match value {
        FieldValue::Select(choice) if !column.options.iter().any(|o| o == choice) => {
            violations.push(Violation::NotAnOption {
                column_id: column.id.clone(),
                value: choice.clone(),
            });
        }
        FieldValue::Number(n) => {
            let below = column.min.is_some_and(|min| *n < min);
            let above = column.max.is_some_and(|max| *n > max);
            if below || above || !n.is_finite() {
                violations.push(Violation::OutOfRange {
                    column_id: column.id.clone(),
                    value: *n,
                    min: column.min,
                    max: column.max,
                });
            }
        }
        _ => {}
    }
}
