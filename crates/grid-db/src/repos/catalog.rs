//! Category and column-definition repository.

use chrono::{DateTime, Utc};

use grid_core::entities::{Category, ColumnDefinition};
use grid_core::enums::ColumnKind;
use grid_core::ids::{PREFIX_CATEGORY, PREFIX_COLUMN};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_u32, opt_datetime, opt_real, opt_text, parse_datetime, parse_enum,
    parse_json, parse_optional_datetime, to_json,
};
use crate::service::GridService;

const CATEGORY_COLS: &str = "id, name, description, deadline, active, created_at";

const COLUMN_COLS: &str =
    "id, category_id, name, kind, required, options, min_value, max_value, position";

/// Fields of a column to add to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub required: bool,
    pub options: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

fn row_to_category(row: &libsql::Row) -> Result<Category, DatabaseError> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        deadline: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        active: row.get::<i64>(4)? != 0,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn row_to_column(row: &libsql::Row) -> Result<ColumnDefinition, DatabaseError> {
    Ok(ColumnDefinition {
        id: row.get(0)?,
        category_id: row.get(1)?,
        name: row.get(2)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        required: row.get::<i64>(4)? != 0,
        options: parse_json(&row.get::<String>(5)?)?,
        min: row.get::<Option<f64>>(6)?,
        max: row.get::<Option<f64>>(7)?,
        position: get_u32(row, 8)?,
    })
}

impl GridService {
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Category, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CATEGORY).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO categories ({CATEGORY_COLS}) VALUES (?1, ?2, ?3, ?4, 1, ?5)"),
                libsql::params![
                    id.as_str(),
                    name,
                    opt_text(description),
                    opt_datetime(deadline),
                    now.to_rfc3339()
                ],
            )
            .await?;
        self.get_category(&id).await
    }

    pub async fn get_category(&self, id: &str) -> Result<Category, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CATEGORY_COLS} FROM categories WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_category(&row)
    }

    pub async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, DatabaseError> {
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CATEGORY_COLS} FROM categories {filter} ORDER BY name"),
                (),
            )
            .await?;

        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    pub async fn set_category_active(
        &self,
        id: &str,
        active: bool,
    ) -> Result<Category, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE categories SET active = ?1 WHERE id = ?2",
                libsql::params![i64::from(active), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_category(id).await
    }

    /// Append a column to a category. The new column is placed after the
    /// existing ones.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a select column without
    /// options or a range whose min exceeds its max.
    pub async fn add_column(
        &self,
        category_id: &str,
        spec: &ColumnSpec,
    ) -> Result<ColumnDefinition, DatabaseError> {
        if spec.kind == ColumnKind::Select && spec.options.is_empty() {
            return Err(DatabaseError::InvalidState(format!(
                "select column '{}' needs at least one option",
                spec.name
            )));
        }
        if let (Some(min), Some(max)) = (spec.min, spec.max) {
            if min > max {
                return Err(DatabaseError::InvalidState(format!(
                    "column '{}' has min {min} above max {max}",
                    spec.name
                )));
            }
        }

        // Make sure the category exists before computing the position.
        self.get_category(category_id).await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(MAX(position) + 1, 0)
                 FROM category_columns WHERE category_id = ?1",
                [category_id],
            )
            .await?;
        let position = match rows.next().await? {
            Some(row) => get_u32(&row, 0)?,
            None => 0,
        };

        let id = self.db().generate_id(PREFIX_COLUMN).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO category_columns ({COLUMN_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    category_id,
                    spec.name.as_str(),
                    spec.kind.as_str(),
                    i64::from(spec.required),
                    to_json(&spec.options)?,
                    opt_real(spec.min),
                    opt_real(spec.max),
                    i64::from(position)
                ],
            )
            .await?;

        Ok(ColumnDefinition {
            id,
            category_id: category_id.to_string(),
            name: spec.name.clone(),
            kind: spec.kind,
            required: spec.required,
            options: spec.options.clone(),
            min: spec.min,
            max: spec.max,
            position,
        })
    }

    /// Columns of a category in display order.
    pub async fn list_columns(
        &self,
        category_id: &str,
    ) -> Result<Vec<ColumnDefinition>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMN_COLS} FROM category_columns
                     WHERE category_id = ?1 ORDER BY position"
                ),
                [category_id],
            )
            .await?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().await? {
            columns.push(row_to_column(&row)?);
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_category_roundtrip() {
        let svc = test_service().await;
        let category = svc
            .create_category("Staff", Some("Teaching staff counts"), None)
            .await
            .unwrap();
        assert!(category.id.starts_with("cat-"));
        assert!(category.active);

        let fetched = svc.get_category(&category.id).await.unwrap();
        assert_eq!(fetched, category);
    }

    #[tokio::test]
    async fn columns_keep_insertion_order() {
        let svc = test_service().await;
        let category = svc.create_category("Staff", None, None).await.unwrap();

        let first = svc
            .add_column(
                &category.id,
                &ColumnSpec::new("Teachers", ColumnKind::Number)
                    .required()
                    .range(Some(0.0), None),
            )
            .await
            .unwrap();
        let second = svc
            .add_column(
                &category.id,
                &ColumnSpec::new("Shift", ColumnKind::Select)
                    .options(vec!["morning".into(), "evening".into()]),
            )
            .await
            .unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);

        let columns = svc.list_columns(&category.id).await.unwrap();
        assert_eq!(columns, vec![first, second]);
    }

    #[tokio::test]
    async fn select_column_without_options_rejected() {
        let svc = test_service().await;
        let category = svc.create_category("Staff", None, None).await.unwrap();
        let result = svc
            .add_column(&category.id, &ColumnSpec::new("Shift", ColumnKind::Select))
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn column_for_missing_category_rejected() {
        let svc = test_service().await;
        let result = svc
            .add_column("cat-missing0", &ColumnSpec::new("Teachers", ColumnKind::Number))
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn inactive_categories_filtered() {
        let svc = test_service().await;
        let a = svc.create_category("A", None, None).await.unwrap();
        svc.create_category("B", None, None).await.unwrap();
        let a = svc.set_category_active(&a.id, false).await.unwrap();
        assert!(!a.active);

        assert_eq!(svc.list_categories(true).await.unwrap().len(), 1);
        assert_eq!(svc.list_categories(false).await.unwrap().len(), 2);
    }
}
