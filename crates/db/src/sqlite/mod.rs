//! SQLite-Backend-Implementierungen fuer alle Repository-Traits
//!
//! IDs werden als TEXT (UUID), Zeitstempel als RFC-3339-TEXT und
//! Kalenderdaten als `YYYY-MM-DD` gespeichert.

pub mod executives;
pub mod finance;
pub mod members;
pub mod notices;
pub mod pool;
pub mod projects;
pub mod sessions;
pub mod taskforce;
pub mod tenures;

pub use pool::SqliteDb;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

const DATUM_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn uuid_lesen(row: &SqliteRow, spalte: &str) -> DbResult<Uuid> {
    let text: String = row.try_get(spalte)?;
    Uuid::parse_str(&text)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID in '{spalte}' ('{text}'): {e}")))
}

pub(crate) fn uuid_opt_lesen(row: &SqliteRow, spalte: &str) -> DbResult<Option<Uuid>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref()
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|e| DbError::intern(format!("Ungueltige UUID in '{spalte}' ('{s}'): {e}")))
        })
        .transpose()
}

pub(crate) fn zeit_lesen(row: &SqliteRow, spalte: &str) -> DbResult<DateTime<Utc>> {
    let text: String = row.try_get(spalte)?;
    zeit_parsen(&text, spalte)
}

pub(crate) fn zeit_opt_lesen(row: &SqliteRow, spalte: &str) -> DbResult<Option<DateTime<Utc>>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref().map(|s| zeit_parsen(s, spalte)).transpose()
}

pub(crate) fn datum_lesen(row: &SqliteRow, spalte: &str) -> DbResult<NaiveDate> {
    let text: String = row.try_get(spalte)?;
    datum_parsen(&text, spalte)
}

pub(crate) fn datum_opt_lesen(row: &SqliteRow, spalte: &str) -> DbResult<Option<NaiveDate>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref().map(|s| datum_parsen(s, spalte)).transpose()
}

pub(crate) fn datum_text(datum: NaiveDate) -> String {
    datum.format(DATUM_FORMAT).to_string()
}

fn zeit_parsen(text: &str, spalte: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltige {spalte} '{text}': {e}")))
}

fn datum_parsen(text: &str, spalte: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATUM_FORMAT)
        .map_err(|e| DbError::intern(format!("Ungueltiges Datum in '{spalte}' ('{text}'): {e}")))
}
