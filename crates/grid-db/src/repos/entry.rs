//! Data entry repository: insert, fetch, conditional update, filtered listing.

use grid_core::entities::DataEntry;
use grid_core::enums::EntryStatus;
use grid_core::ids::PREFIX_ENTRY;
use grid_core::ports::{EntryFilter, NewEntry};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_u32, opt_datetime, opt_text, parse_datetime, parse_enum, parse_json,
    parse_optional_datetime, to_json,
};
use crate::service::GridService;

const SELECT_COLS: &str = "id, category_id, school_id, payload, status, version, created_by, \
     created_at, updated_at, submitted_at, approved_by, approved_at, rejected_by, rejected_at, \
     rejection_reason";

fn row_to_entry(row: &libsql::Row) -> Result<DataEntry, DatabaseError> {
    Ok(DataEntry {
        id: row.get(0)?,
        category_id: row.get(1)?,
        school_id: row.get(2)?,
        payload: parse_json(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        version: get_u32(row, 5)?,
        created_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        approved_by: get_opt_string(row, 10)?,
        approved_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        rejected_by: get_opt_string(row, 12)?,
        rejected_at: parse_optional_datetime(get_opt_string(row, 13)?.as_deref())?,
        rejection_reason: get_opt_string(row, 14)?,
    })
}

/// Outcome of a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The row matched and was replaced.
    Applied,
    /// The row exists but its status or version moved on.
    Stale,
    /// No row with that ID.
    Missing,
}

impl GridService {
    pub async fn insert_entry(&self, new: &NewEntry) -> Result<DataEntry, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ENTRY).await?;
        let entry = DataEntry::draft(
            id,
            new.category_id.as_str(),
            new.school_id.as_str(),
            new.created_by.as_str(),
            new.payload.clone(),
            new.created_at,
        );

        self.db()
            .conn()
            .execute(
                "INSERT INTO data_entries
                    (id, category_id, school_id, payload, status, version, created_by,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    entry.id.as_str(),
                    entry.category_id.as_str(),
                    entry.school_id.as_str(),
                    to_json(&entry.payload)?,
                    entry.status.as_str(),
                    i64::from(entry.version),
                    entry.created_by.as_str(),
                    entry.created_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(entry_id = %entry.id, school_id = %entry.school_id, "inserted draft entry");
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<DataEntry, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM data_entries WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_entry(&row)
    }

    /// Replace every mutable column of `next.id` if the stored row is still
    /// at `(expected_status, expected_version)`.
    pub async fn swap_entry(
        &self,
        next: &DataEntry,
        expected_status: EntryStatus,
        expected_version: u32,
    ) -> Result<SwapOutcome, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE data_entries SET
                    payload = ?1, status = ?2, version = ?3, updated_at = ?4,
                    submitted_at = ?5, approved_by = ?6, approved_at = ?7,
                    rejected_by = ?8, rejected_at = ?9, rejection_reason = ?10
                 WHERE id = ?11 AND status = ?12 AND version = ?13",
                libsql::params![
                    to_json(&next.payload)?,
                    next.status.as_str(),
                    i64::from(next.version),
                    next.updated_at.to_rfc3339(),
                    opt_datetime(next.submitted_at),
                    opt_text(next.approved_by.as_deref()),
                    opt_datetime(next.approved_at),
                    opt_text(next.rejected_by.as_deref()),
                    opt_datetime(next.rejected_at),
                    opt_text(next.rejection_reason.as_deref()),
                    next.id.as_str(),
                    expected_status.as_str(),
                    i64::from(expected_version)
                ],
            )
            .await?;

        if changed > 0 {
            return Ok(SwapOutcome::Applied);
        }

        let mut rows = self
            .db()
            .conn()
            .query("SELECT 1 FROM data_entries WHERE id = ?1", [next.id.as_str()])
            .await?;
        if rows.next().await?.is_some() {
            Ok(SwapOutcome::Stale)
        } else {
            Ok(SwapOutcome::Missing)
        }
    }

    /// List entries matching `filter`, most recently updated first.
    pub async fn list_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<DataEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref category_id) = filter.category_id {
            params.push(libsql::Value::Text(category_id.clone()));
            conditions.push(format!("category_id = ?{}", params.len()));
        }
        if let Some(ref school_id) = filter.school_id {
            params.push(libsql::Value::Text(school_id.clone()));
            conditions.push(format!("school_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref created_by) = filter.created_by {
            params.push(libsql::Value::Text(created_by.clone()));
            conditions.push(format!("created_by = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM data_entries {where_clause}
             ORDER BY updated_at DESC, id LIMIT {limit} OFFSET {offset}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{Fixture, fixture, test_service};
    use chrono::Utc;
    use grid_core::enums::Transition;
    use grid_core::payload::{EntryPayload, FieldValue};
    use pretty_assertions::assert_eq;

    fn new_entry(fx: &Fixture, school_id: &str) -> NewEntry {
        NewEntry {
            category_id: fx.category.id.clone(),
            school_id: school_id.to_string(),
            created_by: "usr-creator".into(),
            payload: EntryPayload::new().with(fx.teachers.id.as_str(), FieldValue::Number(14.0)),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_entry_roundtrip() {
        let svc = test_service().await;
        let fx = fixture(&svc).await;

        let entry = svc.insert_entry(&new_entry(&fx, &fx.school.id)).await.unwrap();
        assert!(entry.id.starts_with("ent-"));
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(entry.version, 1);

        let fetched = svc.get_entry(&entry.id).await.unwrap();
        assert_eq!(fetched, entry);
    }

    #[tokio::test]
    async fn duplicate_category_school_pair_rejected() {
        let svc = test_service().await;
        let fx = fixture(&svc).await;

        svc.insert_entry(&new_entry(&fx, &fx.school.id)).await.unwrap();
        let err = svc
            .insert_entry(&new_entry(&fx, &fx.school.id))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "{err}");
    }

    #[tokio::test]
    async fn swap_applies_only_at_expected_version() {
        let svc = test_service().await;
        let fx = fixture(&svc).await;
        let entry = svc.insert_entry(&new_entry(&fx, &fx.school.id)).await.unwrap();

        let submitted = entry
            .transitioned(Transition::Submit, "usr-creator", None, Utc::now())
            .unwrap();
        let outcome = svc
            .swap_entry(&submitted, EntryStatus::Draft, 1)
            .await
            .unwrap();
        assert_eq!(outcome, SwapOutcome::Applied);
        assert_eq!(svc.get_entry(&entry.id).await.unwrap(), submitted);

        // Same swap again: the row already moved on.
        let outcome = svc
            .swap_entry(&submitted, EntryStatus::Draft, 1)
            .await
            .unwrap();
        assert_eq!(outcome, SwapOutcome::Stale);
    }

    #[tokio::test]
    async fn swap_on_missing_row() {
        let svc = test_service().await;
        let fx = fixture(&svc).await;
        let mut ghost = svc.insert_entry(&new_entry(&fx, &fx.school.id)).await.unwrap();
        ghost.id = "ent-00000000".into();
        let outcome = svc.swap_entry(&ghost, EntryStatus::Draft, 1).await.unwrap();
        assert_eq!(outcome, SwapOutcome::Missing);
    }

    #[tokio::test]
    async fn list_entries_filters_and_paginates() {
        let svc = test_service().await;
        let fx = fixture(&svc).await;
        let other = svc.create_school(&fx.school.sector_id, "Other").await.unwrap();
        let third = svc.create_school(&fx.school.sector_id, "Third").await.unwrap();

        let a = svc.insert_entry(&new_entry(&fx, &fx.school.id)).await.unwrap();
        svc.insert_entry(&new_entry(&fx, &other.id)).await.unwrap();
        svc.insert_entry(&new_entry(&fx, &third.id)).await.unwrap();

        let submitted = a
            .transitioned(Transition::Submit, "usr-creator", None, Utc::now())
            .unwrap();
        svc.swap_entry(&submitted, EntryStatus::Draft, 1).await.unwrap();

        let drafts = svc
            .list_entries(&EntryFilter {
                status: Some(EntryStatus::Draft),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(drafts.len(), 2);

        let for_school = svc
            .list_entries(&EntryFilter {
                school_id: Some(fx.school.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_school.len(), 1);
        assert_eq!(for_school[0].status, EntryStatus::Submitted);

        let page_one = svc
            .list_entries(&EntryFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        let page_two = svc
            .list_entries(&EntryFilter {
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page_one.len(), 2);
        assert_eq!(page_two.len(), 1);
        // Most recently updated first.
        assert_eq!(page_one[0].id, a.id);
    }
}
