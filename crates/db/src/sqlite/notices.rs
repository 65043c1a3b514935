//! SQLite-Implementierungen fuer Ankuendigungen und Sitzungsprotokolle

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{AnkuendigungDaten, AnkuendigungRecord, ProtokollDaten, ProtokollRecord};
use crate::repository::{AnnouncementRepository, DbResult, MinutesRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{datum_lesen, datum_text, uuid_lesen, uuid_opt_lesen, zeit_lesen};

const ANKUENDIGUNG_SPALTEN: &str = "id, title, message, is_active, recorded_by, created_at";
const PROTOKOLL_SPALTEN: &str = "id, title, meeting_date, content, recorded_by, created_at";

#[async_trait]
impl AnnouncementRepository for SqliteDb {
    async fn create(
        &self,
        data: AnkuendigungDaten,
        recorded_by: Option<Uuid>,
    ) -> DbResult<AnkuendigungRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO announcements (id, title, message, is_active, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.is_active)
        .bind(recorded_by.map(|u| u.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(AnkuendigungRecord {
            id,
            title: data.title,
            message: data.message,
            is_active: data.is_active,
            recorded_by,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<AnkuendigungRecord>> {
        let sql = format!("SELECT {ANKUENDIGUNG_SPALTEN} FROM announcements WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_ankuendigung(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: AnkuendigungDaten) -> DbResult<AnkuendigungRecord> {
        let affected =
            sqlx::query("UPDATE announcements SET title = ?, message = ?, is_active = ? WHERE id = ?")
                .bind(&data.title)
                .bind(&data.message)
                .bind(data.is_active)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?
                .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Ankuendigung {id}")));
        }
        AnnouncementRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::intern("Ankuendigung nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list_active(&self) -> DbResult<Vec<AnkuendigungRecord>> {
        let sql = format!(
            "SELECT {ANKUENDIGUNG_SPALTEN} FROM announcements
             WHERE is_active = 1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_ankuendigung).collect()
    }

    async fn count_active(&self) -> DbResult<i64> {
        let anzahl: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM announcements WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(anzahl)
    }
}

fn row_to_ankuendigung(row: &sqlx::sqlite::SqliteRow) -> DbResult<AnkuendigungRecord> {
    Ok(AnkuendigungRecord {
        id: uuid_lesen(row, "id")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        is_active: row.try_get("is_active")?,
        recorded_by: uuid_opt_lesen(row, "recorded_by")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

#[async_trait]
impl MinutesRepository for SqliteDb {
    async fn create(
        &self,
        data: ProtokollDaten,
        recorded_by: Option<Uuid>,
    ) -> DbResult<ProtokollRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO meeting_minutes (id, title, meeting_date, content, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(datum_text(data.meeting_date))
        .bind(&data.content)
        .bind(recorded_by.map(|u| u.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(ProtokollRecord {
            id,
            title: data.title,
            meeting_date: data.meeting_date,
            content: data.content,
            recorded_by,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<ProtokollRecord>> {
        let sql = format!("SELECT {PROTOKOLL_SPALTEN} FROM meeting_minutes WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_protokoll(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: ProtokollDaten) -> DbResult<ProtokollRecord> {
        let affected = sqlx::query(
            "UPDATE meeting_minutes SET title = ?, meeting_date = ?, content = ? WHERE id = ?",
        )
        .bind(&data.title)
        .bind(datum_text(data.meeting_date))
        .bind(&data.content)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Protokoll {id}")));
        }
        MinutesRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::intern("Protokoll nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM meeting_minutes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self) -> DbResult<Vec<ProtokollRecord>> {
        let sql = format!(
            "SELECT {PROTOKOLL_SPALTEN} FROM meeting_minutes ORDER BY meeting_date DESC, created_at DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_protokoll).collect()
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meeting_minutes")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }
}

fn row_to_protokoll(row: &sqlx::sqlite::SqliteRow) -> DbResult<ProtokollRecord> {
    Ok(ProtokollRecord {
        id: uuid_lesen(row, "id")?,
        title: row.try_get("title")?,
        meeting_date: datum_lesen(row, "meeting_date")?,
        content: row.try_get("content")?,
        recorded_by: uuid_opt_lesen(row, "recorded_by")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}
