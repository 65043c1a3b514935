//! SQLite-Implementierung des MemberRepository

use async_trait::async_trait;
use chrono::Utc;
use oya_core::ExekutivPosition;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{MitgliedRecord, MitgliedUpdate, NeuesMitglied};
use crate::repository::{DbResult, MemberRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_lesen, zeit_lesen, zeit_opt_lesen};

const SPALTEN: &str = "id, serial_number, full_name, phone_number, pin_hash, role, \
                       executive_position, status, created_at, last_login";

#[async_trait]
impl MemberRepository for SqliteDb {
    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO members (id, serial_number, full_name, phone_number, pin_hash, role, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.serial_number)
        .bind(data.full_name)
        .bind(data.phone_number)
        .bind(data.pin_hash)
        .bind(data.role.als_str())
        .bind(data.status.als_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::aus_sqlx_eindeutig(
                e,
                format!("Seriennummer '{}' bereits vergeben", data.serial_number),
            )
        })?;

        Ok(MitgliedRecord {
            id,
            serial_number: data.serial_number.to_string(),
            full_name: data.full_name.to_string(),
            phone_number: data.phone_number.to_string(),
            pin_hash: data.pin_hash.to_string(),
            role: data.role,
            executive_position: None,
            status: data.status,
            created_at: now,
            last_login: None,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<MitgliedRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM members WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_mitglied(&r)).transpose()
    }

    async fn get_by_serial(&self, serial_number: &str) -> DbResult<Option<MitgliedRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM members WHERE serial_number = ?");
        let row = sqlx::query(&sql)
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_mitglied(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: MitgliedUpdate) -> DbResult<MitgliedRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = Vec::new();
        if data.serial_number.is_some() {
            sets.push("serial_number = ?");
        }
        if data.full_name.is_some() {
            sets.push("full_name = ?");
        }
        if data.phone_number.is_some() {
            sets.push("phone_number = ?");
        }
        if data.pin_hash.is_some() {
            sets.push("pin_hash = ?");
        }
        if data.role.is_some() {
            sets.push("role = ?");
        }
        if data.executive_position.is_some() {
            sets.push("executive_position = ?");
        }
        if data.status.is_some() {
            sets.push("status = ?");
        }
        if data.last_login.is_some() {
            sets.push("last_login = ?");
        }

        if sets.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("Mitglied {id}")));
        }

        let sql = format!("UPDATE members SET {} WHERE id = ?", sets.join(", "));
        let mut q = sqlx::query(&sql);

        if let Some(ref v) = data.serial_number {
            q = q.bind(v);
        }
        if let Some(ref v) = data.full_name {
            q = q.bind(v);
        }
        if let Some(ref v) = data.phone_number {
            q = q.bind(v);
        }
        if let Some(ref v) = data.pin_hash {
            q = q.bind(v);
        }
        if let Some(v) = data.role {
            q = q.bind(v.als_str());
        }
        if let Some(v) = data.executive_position {
            q = q.bind(v.map(|p| p.als_str()));
        }
        if let Some(v) = data.status {
            q = q.bind(v.als_str());
        }
        if let Some(ref v) = data.last_login {
            q = q.bind(v.to_rfc3339());
        }
        q = q.bind(id.to_string());

        let affected = q
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::aus_sqlx_eindeutig(e, "Seriennummer bereits vergeben"))?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Mitglied {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("Mitglied nach Update nicht gefunden"))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self, suche: Option<&str>) -> DbResult<Vec<MitgliedRecord>> {
        let suche = suche.map(str::trim).filter(|s| !s.is_empty());

        let rows = match suche {
            Some(begriff) => {
                let muster = format!(
                    "%{}%",
                    begriff
                        .to_lowercase()
                        .replace('\\', "\\\\")
                        .replace('%', "\\%")
                        .replace('_', "\\_")
                );
                let sql = format!(
                    "SELECT {SPALTEN} FROM members
                     WHERE LOWER(full_name) LIKE ? ESCAPE '\\'
                        OR LOWER(serial_number) LIKE ? ESCAPE '\\'
                        OR LOWER(phone_number) LIKE ? ESCAPE '\\'
                     ORDER BY serial_number"
                );
                sqlx::query(&sql)
                    .bind(&muster)
                    .bind(&muster)
                    .bind(&muster)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {SPALTEN} FROM members ORDER BY serial_number");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(row_to_mitglied).collect()
    }

    async fn count(&self) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl)
    }

    async fn update_last_login(&self, id: Uuid) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE members SET last_login = ? WHERE id = ?")
            .bind(&now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub(crate) fn row_to_mitglied(row: &sqlx::sqlite::SqliteRow) -> DbResult<MitgliedRecord> {
    use sqlx::Row as _;

    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    let position: Option<String> = row.try_get("executive_position")?;

    Ok(MitgliedRecord {
        id: uuid_lesen(row, "id")?,
        serial_number: row.try_get("serial_number")?,
        full_name: row.try_get("full_name")?,
        phone_number: row.try_get("phone_number")?,
        pin_hash: row.try_get("pin_hash")?,
        role: role.parse()?,
        executive_position: position
            .as_deref()
            .map(str::parse::<ExekutivPosition>)
            .transpose()?,
        status: status.parse()?,
        created_at: zeit_lesen(row, "created_at")?,
        last_login: zeit_opt_lesen(row, "last_login")?,
    })
}
