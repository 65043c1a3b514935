//! SQLite-Implementierung des ExecutiveRepository
//!
//! Eine Position hat hoechstens einen Inhaber, ein Mitglied hoechstens eine
//! Position. Beides wird durch Unique-Indizes abgesichert; `assign` laeuft
//! komplett in einer Transaktion (letzter Schreiber gewinnt).

use async_trait::async_trait;
use chrono::Utc;
use oya_core::{ExekutivPosition, Rolle};
use sqlx::Row as _;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{ExekutiveEintrag, ExekutiveRecord};
use crate::repository::{DbResult, ExecutiveRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_lesen, zeit_lesen};

const KONTEXT_ZUWEISEN: &str = "Exekutiv-Position zuweisen";
const KONTEXT_ENTFERNEN: &str = "Exekutiv-Position entfernen";

#[async_trait]
impl ExecutiveRepository for SqliteDb {
    async fn assign(
        &self,
        member_id: Uuid,
        position: ExekutivPosition,
    ) -> DbResult<ExekutiveRecord> {
        let konflikt = |e: sqlx::Error| DbError::aus_sqlx_transaktion(e, KONTEXT_ZUWEISEN);
        let mut tx = self.pool.begin().await.map_err(konflikt)?;

        let rolle: Option<String> = sqlx::query_scalar("SELECT role FROM members WHERE id = ?")
            .bind(member_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(konflikt)?;
        let rolle: Rolle = match rolle {
            Some(r) => r.parse()?,
            None => return Err(DbError::nicht_gefunden(format!("Mitglied {member_id}"))),
        };

        // Bisherigen Inhaber der Position verdraengen
        let bisheriger: Option<String> =
            sqlx::query_scalar("SELECT member_id FROM executives WHERE position = ?")
                .bind(position.als_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(konflikt)?;

        if let Some(ref alt) = bisheriger {
            if *alt != member_id.to_string() {
                sqlx::query("DELETE FROM executives WHERE position = ?")
                    .bind(position.als_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(konflikt)?;

                sqlx::query(
                    "UPDATE members
                     SET executive_position = NULL,
                         role = CASE WHEN role = 'executive' THEN 'member' ELSE role END
                     WHERE id = ?",
                )
                .bind(alt)
                .execute(&mut *tx)
                .await
                .map_err(konflikt)?;

                debug!(position = %position, verdraengt = %alt, "Bisheriger Inhaber entfernt");
            }
        }

        // Eigene bisherige Besetzung wird verschoben
        sqlx::query("DELETE FROM executives WHERE member_id = ?")
            .bind(member_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(konflikt)?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO executives (id, member_id, position, assigned_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(member_id.to_string())
        .bind(position.als_str())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(konflikt)?;

        let neue_rolle = rolle.max(Rolle::Exekutive);
        sqlx::query("UPDATE members SET executive_position = ?, role = ? WHERE id = ?")
            .bind(position.als_str())
            .bind(neue_rolle.als_str())
            .bind(member_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(konflikt)?;

        tx.commit().await.map_err(konflikt)?;

        info!(member_id = %member_id, position = %position, "Exekutiv-Position besetzt");

        Ok(ExekutiveRecord {
            id,
            member_id,
            position,
            assigned_at: now,
        })
    }

    async fn remove(&self, id: Uuid) -> DbResult<bool> {
        let konflikt = |e: sqlx::Error| DbError::aus_sqlx_transaktion(e, KONTEXT_ENTFERNEN);
        let mut tx = self.pool.begin().await.map_err(konflikt)?;

        let member_id: Option<String> =
            sqlx::query_scalar("SELECT member_id FROM executives WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(konflikt)?;

        let Some(member_id) = member_id else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM executives WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(konflikt)?;

        sqlx::query(
            "UPDATE members
             SET executive_position = NULL,
                 role = CASE WHEN role = 'executive' THEN 'member' ELSE role END
             WHERE id = ?",
        )
        .bind(&member_id)
        .execute(&mut *tx)
        .await
        .map_err(konflikt)?;

        tx.commit().await.map_err(konflikt)?;

        info!(member_id = %member_id, "Exekutiv-Position entfernt");
        Ok(true)
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<ExekutiveRecord>> {
        let row = sqlx::query(
            "SELECT id, member_id, position, assigned_at FROM executives WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_exekutive(&r)).transpose()
    }

    async fn holder_of(&self, position: ExekutivPosition) -> DbResult<Vec<ExekutiveRecord>> {
        let rows = sqlx::query(
            "SELECT id, member_id, position, assigned_at FROM executives WHERE position = ?",
        )
        .bind(position.als_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_exekutive).collect()
    }

    async fn list(&self) -> DbResult<Vec<ExekutiveEintrag>> {
        let rows = sqlx::query(
            "SELECT e.id, e.member_id, e.position, e.assigned_at, m.full_name, m.serial_number
             FROM executives e
             JOIN members m ON m.id = e.member_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut eintraege = rows
            .iter()
            .map(|row| -> DbResult<ExekutiveEintrag> {
                let basis = row_to_exekutive(row)?;
                Ok(ExekutiveEintrag {
                    id: basis.id,
                    member_id: basis.member_id,
                    position: basis.position,
                    full_name: row.try_get("full_name")?,
                    serial_number: row.try_get("serial_number")?,
                    assigned_at: basis.assigned_at,
                })
            })
            .collect::<DbResult<Vec<_>>>()?;

        // Rangfolge der Positionen, nicht alphabetisch
        eintraege.sort_by_key(|e| e.position);
        Ok(eintraege)
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM executives")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }
}

fn row_to_exekutive(row: &sqlx::sqlite::SqliteRow) -> DbResult<ExekutiveRecord> {
    let position: String = row.try_get("position")?;
    Ok(ExekutiveRecord {
        id: uuid_lesen(row, "id")?,
        member_id: uuid_lesen(row, "member_id")?,
        position: position.parse()?,
        assigned_at: zeit_lesen(row, "assigned_at")?,
    })
}
