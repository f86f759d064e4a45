//! Region, sector, and school repository.

use chrono::Utc;

use grid_core::entities::{Region, School, Sector};
use grid_core::ids::{PREFIX_REGION, PREFIX_SCHOOL, PREFIX_SECTOR};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::GridService;

const SCHOOL_SELECT: &str = "SELECT s.id, s.sector_id, sec.region_id, s.name, s.created_at
     FROM schools s JOIN sectors sec ON sec.id = s.sector_id";

fn row_to_school(row: &libsql::Row) -> Result<School, DatabaseError> {
    Ok(School {
        id: row.get(0)?,
        sector_id: row.get(1)?,
        region_id: row.get(2)?,
        name: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl GridService {
    pub async fn create_region(&self, name: &str) -> Result<Region, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_REGION).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO regions (id, name, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![id.as_str(), name, now.to_rfc3339()],
            )
            .await?;
        Ok(Region {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn create_sector(
        &self,
        region_id: &str,
        name: &str,
    ) -> Result<Sector, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SECTOR).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO sectors (id, region_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id.as_str(), region_id, name, now.to_rfc3339()],
            )
            .await?;
        Ok(Sector {
            id,
            region_id: region_id.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn create_school(
        &self,
        sector_id: &str,
        name: &str,
    ) -> Result<School, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SCHOOL).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO schools (id, sector_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id.as_str(), sector_id, name, now.to_rfc3339()],
            )
            .await?;
        self.get_school(&id).await
    }

    pub async fn get_school(&self, id: &str) -> Result<School, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("{SCHOOL_SELECT} WHERE s.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_school(&row)
    }

    /// List schools, optionally restricted to one sector, ordered by name.
    pub async fn list_schools(
        &self,
        sector_id: Option<&str>,
    ) -> Result<Vec<School>, DatabaseError> {
        let mut rows = match sector_id {
            Some(sector_id) => {
                self.db()
                    .conn()
                    .query(
                        &format!("{SCHOOL_SELECT} WHERE s.sector_id = ?1 ORDER BY s.name"),
                        [sector_id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(&format!("{SCHOOL_SELECT} ORDER BY s.name"), ())
                    .await?
            }
        };

        let mut schools = Vec::new();
        while let Some(row) = rows.next().await? {
            schools.push(row_to_school(&row)?);
        }
        Ok(schools)
    }
}
