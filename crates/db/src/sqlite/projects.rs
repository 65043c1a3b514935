//! SQLite-Implementierung des ProjectRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{ProjektDaten, ProjektRecord, ProjektStatus};
use crate::repository::{DbResult, ProjectRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{datum_opt_lesen, datum_text, uuid_lesen, uuid_opt_lesen, zeit_lesen};

const SPALTEN: &str = "id, title, description, status, started_by_tenure, completed_by_tenure, \
                       start_date, end_date, created_at";

#[async_trait]
impl ProjectRepository for SqliteDb {
    async fn create(&self, data: ProjektDaten) -> DbResult<ProjektRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO projects (id, title, description, status, started_by_tenure,
                                   completed_by_tenure, start_date, end_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.als_str())
        .bind(data.started_by_tenure.map(|u| u.to_string()))
        .bind(data.completed_by_tenure.map(|u| u.to_string()))
        .bind(data.start_date.map(datum_text))
        .bind(data.end_date.map(datum_text))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(ProjektRecord {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            started_by_tenure: data.started_by_tenure,
            completed_by_tenure: data.completed_by_tenure,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<ProjektRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM projects WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_projekt(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: ProjektDaten) -> DbResult<ProjektRecord> {
        let affected = sqlx::query(
            "UPDATE projects
             SET title = ?, description = ?, status = ?, started_by_tenure = ?,
                 completed_by_tenure = ?, start_date = ?, end_date = ?
             WHERE id = ?",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.als_str())
        .bind(data.started_by_tenure.map(|u| u.to_string()))
        .bind(data.completed_by_tenure.map(|u| u.to_string()))
        .bind(data.start_date.map(datum_text))
        .bind(data.end_date.map(datum_text))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Projekt {id}")));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::intern("Projekt nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self) -> DbResult<Vec<ProjektRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM projects ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_projekt).collect()
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }
}

fn row_to_projekt(row: &sqlx::sqlite::SqliteRow) -> DbResult<ProjektRecord> {
    let status: String = row.try_get("status")?;
    let status: ProjektStatus = status.parse().map_err(DbError::UngueltigeDaten)?;

    Ok(ProjektRecord {
        id: uuid_lesen(row, "id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status,
        started_by_tenure: uuid_opt_lesen(row, "started_by_tenure")?,
        completed_by_tenure: uuid_opt_lesen(row, "completed_by_tenure")?,
        start_date: datum_opt_lesen(row, "start_date")?,
        end_date: datum_opt_lesen(row, "end_date")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}
