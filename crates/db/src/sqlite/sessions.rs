//! SQLite-Implementierung des SessionRepository
//!
//! Zeitstempel werden mit fester Breite (Mikrosekunden, `Z`) gespeichert,
//! damit der Textvergleich in `delete_expired` chronologisch ist.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row as _;
use uuid::Uuid;

use crate::models::SessionRecord;
use crate::repository::{DbResult, SessionRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_lesen, zeit_lesen};

fn zeit_text(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl SessionRepository for SqliteDb {
    async fn insert(&self, session: &SessionRecord) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, member_id, role, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.token_hash)
        .bind(session.member_id.to_string())
        .bind(session.role.als_str())
        .bind(zeit_text(session.created_at))
        .bind(zeit_text(session.expires_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, token_hash: &str) -> DbResult<Option<SessionRecord>> {
        let row = sqlx::query(
            "SELECT token_hash, member_id, role, created_at, expires_at
             FROM sessions WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let role: String = row.try_get("role")?;
                Ok(Some(SessionRecord {
                    token_hash: row.try_get("token_hash")?,
                    member_id: uuid_lesen(&row, "member_id")?,
                    role: role.parse()?,
                    created_at: zeit_lesen(&row, "created_at")?,
                    expires_at: zeit_lesen(&row, "expires_at")?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token_hash: &str) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn delete_for_member(&self, member_id: Uuid) -> DbResult<u64> {
        let affected = sqlx::query("DELETE FROM sessions WHERE member_id = ?")
            .bind(member_id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }

    async fn delete_expired(&self) -> DbResult<u64> {
        let affected = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(zeit_text(Utc::now()))
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }
}
