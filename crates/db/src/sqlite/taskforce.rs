//! SQLite-Implementierungen fuer Task Force und Motorraeder

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{MotorradDaten, MotorradRecord, TaskForceDaten, TaskForceRecord};
use crate::repository::{DbResult, MotorcycleRepository, TaskForceRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{datum_opt_lesen, datum_text, uuid_lesen, uuid_opt_lesen, zeit_lesen};

const TASKFORCE_SPALTEN: &str = "id, member_id, rank, station, joined_on, created_at";
const MOTORRAD_SPALTEN: &str = "id, registration_number, model, assigned_to, status, created_at";

#[async_trait]
impl TaskForceRepository for SqliteDb {
    async fn create(&self, data: TaskForceDaten) -> DbResult<TaskForceRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO taskforce (id, member_id, rank, station, joined_on, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.member_id.to_string())
        .bind(&data.rank)
        .bind(&data.station)
        .bind(data.joined_on.map(datum_text))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(TaskForceRecord {
            id,
            member_id: data.member_id,
            rank: data.rank,
            station: data.station,
            joined_on: data.joined_on,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<TaskForceRecord>> {
        let sql = format!("SELECT {TASKFORCE_SPALTEN} FROM taskforce WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_taskforce(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: TaskForceDaten) -> DbResult<TaskForceRecord> {
        let affected = sqlx::query(
            "UPDATE taskforce SET member_id = ?, rank = ?, station = ?, joined_on = ? WHERE id = ?",
        )
        .bind(data.member_id.to_string())
        .bind(&data.rank)
        .bind(&data.station)
        .bind(data.joined_on.map(datum_text))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Task-Force-Eintrag {id}")));
        }
        TaskForceRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::intern("Task-Force-Eintrag nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM taskforce WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self) -> DbResult<Vec<TaskForceRecord>> {
        let sql = format!("SELECT {TASKFORCE_SPALTEN} FROM taskforce ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_taskforce).collect()
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taskforce")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }
}

fn row_to_taskforce(row: &sqlx::sqlite::SqliteRow) -> DbResult<TaskForceRecord> {
    Ok(TaskForceRecord {
        id: uuid_lesen(row, "id")?,
        member_id: uuid_lesen(row, "member_id")?,
        rank: row.try_get("rank")?,
        station: row.try_get("station")?,
        joined_on: datum_opt_lesen(row, "joined_on")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

#[async_trait]
impl MotorcycleRepository for SqliteDb {
    async fn create(&self, data: MotorradDaten) -> DbResult<MotorradRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO motorcycles (id, registration_number, model, assigned_to, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.registration_number)
        .bind(&data.model)
        .bind(data.assigned_to.map(|u| u.to_string()))
        .bind(&data.status)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::aus_sqlx_eindeutig(
                e,
                format!("Kennzeichen '{}' bereits erfasst", data.registration_number),
            )
        })?;

        Ok(MotorradRecord {
            id,
            registration_number: data.registration_number,
            model: data.model,
            assigned_to: data.assigned_to,
            status: data.status,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<MotorradRecord>> {
        let sql = format!("SELECT {MOTORRAD_SPALTEN} FROM motorcycles WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_motorrad(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: MotorradDaten) -> DbResult<MotorradRecord> {
        let affected = sqlx::query(
            "UPDATE motorcycles
             SET registration_number = ?, model = ?, assigned_to = ?, status = ?
             WHERE id = ?",
        )
        .bind(&data.registration_number)
        .bind(&data.model)
        .bind(data.assigned_to.map(|u| u.to_string()))
        .bind(&data.status)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::aus_sqlx_eindeutig(
                e,
                format!("Kennzeichen '{}' bereits erfasst", data.registration_number),
            )
        })?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Motorrad {id}")));
        }
        MotorcycleRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::intern("Motorrad nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM motorcycles WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self) -> DbResult<Vec<MotorradRecord>> {
        let sql =
            format!("SELECT {MOTORRAD_SPALTEN} FROM motorcycles ORDER BY registration_number");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_motorrad).collect()
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM motorcycles")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }
}

fn row_to_motorrad(row: &sqlx::sqlite::SqliteRow) -> DbResult<MotorradRecord> {
    Ok(MotorradRecord {
        id: uuid_lesen(row, "id")?,
        registration_number: row.try_get("registration_number")?,
        model: row.try_get("model")?,
        assigned_to: uuid_opt_lesen(row, "assigned_to")?,
        status: row.try_get("status")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}
