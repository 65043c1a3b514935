//! SQLite-Implementierungen fuer Beitraege, Einnahmen und Ausgaben
//!
//! Alle Betraege in Cent. Summen ueber leere Mengen ergeben 0.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{
    AusgabeRecord, AusgabeUpdate, BeitragRecord, BeitragUpdate, EinnahmeRecord, NeueAusgabe,
    NeueEinnahme, NeuerBeitrag,
};
use crate::repository::{ContributionRepository, DbResult, ExpenseRepository, IncomeRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{datum_lesen, datum_text, uuid_lesen, uuid_opt_lesen, zeit_lesen};

/// Meldung bei doppeltem Jahresbeitrag (wird unveraendert angezeigt)
pub const BEITRAG_DOPPELT: &str = "This member has already paid dues for this year.";

// ---------------------------------------------------------------------------
// Beitraege
// ---------------------------------------------------------------------------

const BEITRAG_SPALTEN: &str =
    "id, member_id, year, amount_paid, payment_date, recorded_by, created_at";

#[async_trait]
impl ContributionRepository for SqliteDb {
    async fn create(&self, data: NeuerBeitrag) -> DbResult<BeitragRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO contributions (id, member_id, year, amount_paid, payment_date, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.member_id.to_string())
        .bind(data.year)
        .bind(data.amount_paid)
        .bind(datum_text(data.payment_date))
        .bind(data.recorded_by.map(|u| u.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx_eindeutig(e, BEITRAG_DOPPELT))?;

        Ok(BeitragRecord {
            id,
            member_id: data.member_id,
            year: data.year,
            amount_paid: data.amount_paid,
            payment_date: data.payment_date,
            recorded_by: data.recorded_by,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<BeitragRecord>> {
        let sql = format!("SELECT {BEITRAG_SPALTEN} FROM contributions WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_beitrag(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: BeitragUpdate) -> DbResult<BeitragRecord> {
        let mut sets: Vec<&str> = Vec::new();
        if data.member_id.is_some() {
            sets.push("member_id = ?");
        }
        if data.year.is_some() {
            sets.push("year = ?");
        }
        if data.amount_paid.is_some() {
            sets.push("amount_paid = ?");
        }
        if data.payment_date.is_some() {
            sets.push("payment_date = ?");
        }

        if !sets.is_empty() {
            let sql = format!("UPDATE contributions SET {} WHERE id = ?", sets.join(", "));
            let mut q = sqlx::query(&sql);
            if let Some(v) = data.member_id {
                q = q.bind(v.to_string());
            }
            if let Some(v) = data.year {
                q = q.bind(v);
            }
            if let Some(v) = data.amount_paid {
                q = q.bind(v);
            }
            if let Some(v) = data.payment_date {
                q = q.bind(datum_text(v));
            }
            q = q.bind(id.to_string());
            q.execute(&self.pool)
                .await
                .map_err(|e| DbError::aus_sqlx_eindeutig(e, BEITRAG_DOPPELT))?;
        }

        ContributionRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Beitrag {id}")))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM contributions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self, member_id: Option<Uuid>) -> DbResult<Vec<BeitragRecord>> {
        let rows = match member_id {
            Some(m) => {
                let sql = format!(
                    "SELECT {BEITRAG_SPALTEN} FROM contributions WHERE member_id = ?
                     ORDER BY payment_date DESC, created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(m.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {BEITRAG_SPALTEN} FROM contributions
                     ORDER BY payment_date DESC, created_at DESC"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(row_to_beitrag).collect()
    }

    async fn total(&self, member_id: Option<Uuid>) -> DbResult<i64> {
        summe(self, "contributions", "amount_paid", "member_id", member_id).await
    }
}

fn row_to_beitrag(row: &sqlx::sqlite::SqliteRow) -> DbResult<BeitragRecord> {
    Ok(BeitragRecord {
        id: uuid_lesen(row, "id")?,
        member_id: uuid_lesen(row, "member_id")?,
        year: row.try_get("year")?,
        amount_paid: row.try_get("amount_paid")?,
        payment_date: datum_lesen(row, "payment_date")?,
        recorded_by: uuid_opt_lesen(row, "recorded_by")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

// ---------------------------------------------------------------------------
// Einnahmen
// ---------------------------------------------------------------------------

const EINNAHME_SPALTEN: &str =
    "id, member_id, sender_name, sender_id, amount, date, description, recorded_by, created_at";

#[async_trait]
impl IncomeRepository for SqliteDb {
    async fn create(&self, data: NeueEinnahme) -> DbResult<EinnahmeRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO incomes (id, member_id, sender_name, sender_id, amount, date, description, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.member_id.map(|u| u.to_string()))
        .bind(&data.sender_name)
        .bind(&data.sender_id)
        .bind(data.amount)
        .bind(datum_text(data.date))
        .bind(&data.description)
        .bind(data.recorded_by.map(|u| u.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(EinnahmeRecord {
            id,
            member_id: data.member_id,
            sender_name: data.sender_name,
            sender_id: data.sender_id,
            amount: data.amount,
            date: data.date,
            description: data.description,
            recorded_by: data.recorded_by,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<EinnahmeRecord>> {
        let sql = format!("SELECT {EINNAHME_SPALTEN} FROM incomes WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_einnahme(&r)).transpose()
    }

    async fn list(&self, member_id: Option<Uuid>) -> DbResult<Vec<EinnahmeRecord>> {
        let rows = match member_id {
            Some(m) => {
                let sql = format!(
                    "SELECT {EINNAHME_SPALTEN} FROM incomes WHERE member_id = ?
                     ORDER BY date DESC, created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(m.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {EINNAHME_SPALTEN} FROM incomes ORDER BY date DESC, created_at DESC"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(row_to_einnahme).collect()
    }

    async fn total(&self, member_id: Option<Uuid>) -> DbResult<i64> {
        summe(self, "incomes", "amount", "member_id", member_id).await
    }
}

fn row_to_einnahme(row: &sqlx::sqlite::SqliteRow) -> DbResult<EinnahmeRecord> {
    Ok(EinnahmeRecord {
        id: uuid_lesen(row, "id")?,
        member_id: uuid_opt_lesen(row, "member_id")?,
        sender_name: row.try_get("sender_name")?,
        sender_id: row.try_get("sender_id")?,
        amount: row.try_get("amount")?,
        date: datum_lesen(row, "date")?,
        description: row.try_get("description")?,
        recorded_by: uuid_opt_lesen(row, "recorded_by")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

// ---------------------------------------------------------------------------
// Ausgaben
// ---------------------------------------------------------------------------

const AUSGABE_SPALTEN: &str = "id, title, amount, date, project_id, recorded_by, created_at";

#[async_trait]
impl ExpenseRepository for SqliteDb {
    async fn create(&self, data: NeueAusgabe) -> DbResult<AusgabeRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO expenses (id, title, amount, date, project_id, recorded_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(data.amount)
        .bind(datum_text(data.date))
        .bind(data.project_id.map(|u| u.to_string()))
        .bind(data.recorded_by.map(|u| u.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(AusgabeRecord {
            id,
            title: data.title,
            amount: data.amount,
            date: data.date,
            project_id: data.project_id,
            recorded_by: data.recorded_by,
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<AusgabeRecord>> {
        let sql = format!("SELECT {AUSGABE_SPALTEN} FROM expenses WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_ausgabe(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: AusgabeUpdate) -> DbResult<AusgabeRecord> {
        let mut sets: Vec<&str> = Vec::new();
        if data.title.is_some() {
            sets.push("title = ?");
        }
        if data.amount.is_some() {
            sets.push("amount = ?");
        }
        if data.date.is_some() {
            sets.push("date = ?");
        }
        if data.project_id.is_some() {
            sets.push("project_id = ?");
        }

        if !sets.is_empty() {
            let sql = format!("UPDATE expenses SET {} WHERE id = ?", sets.join(", "));
            let mut q = sqlx::query(&sql);
            if let Some(ref v) = data.title {
                q = q.bind(v);
            }
            if let Some(v) = data.amount {
                q = q.bind(v);
            }
            if let Some(v) = data.date {
                q = q.bind(datum_text(v));
            }
            if let Some(v) = data.project_id {
                q = q.bind(v.map(|u| u.to_string()));
            }
            q = q.bind(id.to_string());
            q.execute(&self.pool).await?;
        }

        ExpenseRepository::get(self, id)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Ausgabe {id}")))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn list(&self, project_id: Option<Uuid>) -> DbResult<Vec<AusgabeRecord>> {
        let rows = match project_id {
            Some(p) => {
                let sql = format!(
                    "SELECT {AUSGABE_SPALTEN} FROM expenses WHERE project_id = ?
                     ORDER BY date DESC, created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(p.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {AUSGABE_SPALTEN} FROM expenses ORDER BY date DESC, created_at DESC"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(row_to_ausgabe).collect()
    }

    async fn total(&self, project_id: Option<Uuid>) -> DbResult<i64> {
        summe(self, "expenses", "amount", "project_id", project_id).await
    }
}

fn row_to_ausgabe(row: &sqlx::sqlite::SqliteRow) -> DbResult<AusgabeRecord> {
    Ok(AusgabeRecord {
        id: uuid_lesen(row, "id")?,
        title: row.try_get("title")?,
        amount: row.try_get("amount")?,
        date: datum_lesen(row, "date")?,
        project_id: uuid_opt_lesen(row, "project_id")?,
        recorded_by: uuid_opt_lesen(row, "recorded_by")?,
        created_at: zeit_lesen(row, "created_at")?,
    })
}

/// SUM mit optionalem Filter; Tabellen- und Spaltennamen sind Konstanten
async fn summe(
    db: &SqliteDb,
    tabelle: &str,
    betrag: &str,
    filter_spalte: &str,
    filter: Option<Uuid>,
) -> DbResult<i64> {
    let wert: i64 = match filter {
        Some(id) => {
            let sql = format!(
                "SELECT COALESCE(SUM({betrag}), 0) FROM {tabelle} WHERE {filter_spalte} = ?"
            );
            sqlx::query_scalar(&sql)
                .bind(id.to_string())
                .fetch_one(&db.pool)
                .await?
        }
        None => {
            let sql = format!("SELECT COALESCE(SUM({betrag}), 0) FROM {tabelle}");
            sqlx::query_scalar(&sql).fetch_one(&db.pool).await?
        }
    };
    Ok(wert)
}
