//! SQLite-Implementierung des TenureRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{AmtszeitRecord, AmtszeitUpdate, NeueAmtszeit};
use crate::repository::{DbResult, TenureRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_lesen, zeit_lesen};

const SPALTEN: &str = "id, name, start_year, end_year, is_active, created_at";

#[async_trait]
impl TenureRepository for SqliteDb {
    async fn create_active(&self, data: NeueAmtszeit<'_>) -> DbResult<AmtszeitRecord> {
        let konflikt = |e: sqlx::Error| DbError::aus_sqlx_transaktion(e, "Amtszeit anlegen");
        let mut tx = self.pool.begin().await.map_err(konflikt)?;

        let deaktiviert = sqlx::query("UPDATE tenures SET is_active = 0 WHERE is_active = 1")
            .execute(&mut *tx)
            .await
            .map_err(konflikt)?
            .rows_affected();

        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO tenures (id, name, start_year, end_year, is_active, created_at)
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(id.to_string())
        .bind(data.name)
        .bind(data.start_year)
        .bind(data.end_year)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(konflikt)?;

        tx.commit().await.map_err(konflikt)?;

        info!(tenure_id = %id, name = data.name, deaktiviert, "Neue aktive Amtszeit");

        Ok(AmtszeitRecord {
            id,
            name: data.name.to_string(),
            start_year: data.start_year,
            end_year: data.end_year,
            is_active: true,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<AmtszeitRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM tenures WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_amtszeit(&r)).transpose()
    }

    async fn get_active(&self) -> DbResult<Option<AmtszeitRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM tenures WHERE is_active = 1");
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        row.map(|r| row_to_amtszeit(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: AmtszeitUpdate) -> DbResult<AmtszeitRecord> {
        let mut sets: Vec<&str> = Vec::new();
        if data.name.is_some() {
            sets.push("name = ?");
        }
        if data.start_year.is_some() {
            sets.push("start_year = ?");
        }
        if data.end_year.is_some() {
            sets.push("end_year = ?");
        }

        if !sets.is_empty() {
            let sql = format!("UPDATE tenures SET {} WHERE id = ?", sets.join(", "));
            let mut q = sqlx::query(&sql);
            if let Some(ref v) = data.name {
                q = q.bind(v);
            }
            if let Some(v) = data.start_year {
                q = q.bind(v);
            }
            if let Some(v) = data.end_year {
                q = q.bind(v);
            }
            q = q.bind(id.to_string());
            q.execute(&self.pool).await?;
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Amtszeit {id}")))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM tenures WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self) -> DbResult<Vec<AmtszeitRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM tenures ORDER BY start_year DESC, created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_amtszeit).collect()
    }
}

fn row_to_amtszeit(row: &sqlx::sqlite::SqliteRow) -> DbResult<AmtszeitRecord> {
    Ok(AmtszeitRecord {
        id: uuid_lesen(row, "id")?,
        name: row.try_get("name")?,
        start_year: row.try_get("start_year")?,
        end_year: row.try_get("end_year")?,
        is_active: row.try_get("is_active")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn aktive_einfuegen(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tenures (id, name, start_year, end_year, is_active, created_at)
             VALUES (?, ?, 2024, NULL, 1, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await
        .map(|_| ())
    }

    #[tokio::test]
    async fn zweite_aktive_amtszeit_in_transaktion_ist_konflikt() {
        let db = SqliteDb::in_memory().await.unwrap();
        let mut tx = db.pool.begin().await.unwrap();
        aktive_einfuegen(&mut tx, "Erste").await.unwrap();

        // Ohne vorheriges Deaktivieren greift der Teil-Index
        let fehler = aktive_einfuegen(&mut tx, "Zweite").await.unwrap_err();
        let e = DbError::aus_sqlx_transaktion(fehler, "Amtszeit anlegen");
        assert!(e.ist_konflikt(), "{e}");
        assert!(e.to_string().contains("Amtszeit anlegen"));
        tx.rollback().await.unwrap();

        assert!(db.get_active().await.unwrap().is_none());
    }
}
