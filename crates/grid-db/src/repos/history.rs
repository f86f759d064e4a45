//! Entry history repository.
//!
//! Append-only: rows are inserted once and never updated or deleted (the
//! schema enforces this with triggers). Reads return newest first, ties
//! broken by insertion order.

use grid_core::entities::DataHistory;
use grid_core::ids::PREFIX_HISTORY;
use grid_core::ports::NewHistory;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_text, parse_datetime, parse_enum, parse_json, to_json};
use crate::service::GridService;

const SELECT_COLS: &str =
    "id, entry_id, actor_id, previous_status, status, payload, comment, created_at";

fn row_to_history(row: &libsql::Row) -> Result<DataHistory, DatabaseError> {
    Ok(DataHistory {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        actor_id: row.get(2)?,
        previous_status: parse_enum(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        payload: parse_json(&row.get::<String>(5)?)?,
        comment: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl GridService {
    /// Append a history row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails (e.g. unknown entry).
    pub async fn append_history(&self, record: &NewHistory) -> Result<DataHistory, DatabaseError> {
        let id = self.db().generate_id(PREFIX_HISTORY).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO data_history ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    record.entry_id.as_str(),
                    record.actor_id.as_str(),
                    record.previous_status.as_str(),
                    record.status.as_str(),
                    to_json(&record.payload)?,
                    opt_text(record.comment.as_deref()),
                    record.created_at.to_rfc3339()
                ],
            )
            .await?;

        Ok(DataHistory {
            id,
            entry_id: record.entry_id.clone(),
            actor_id: record.actor_id.clone(),
            previous_status: record.previous_status,
            status: record.status,
            payload: record.payload.clone(),
            comment: record.comment.clone(),
            created_at: record.created_at,
        })
    }

    /// History of one entry, newest first.
    pub async fn entry_history(&self, entry_id: &str) -> Result<Vec<DataHistory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM data_history WHERE entry_id = ?1 ORDER BY seq DESC"
                ),
                [entry_id],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_history(&row)?);
        }
        Ok(records)
    }
}
