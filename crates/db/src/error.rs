//! Fehlertypen fuer das Datenbank-Crate

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Eindeutigkeitsverletzung: {0}")]
    Eindeutigkeit(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    /// Gleichzeitige Schreibvorgaenge auf denselben Einzel-Datensatz
    /// (Position, aktive Amtszeit). Der Aufrufer darf wiederholen.
    #[error("Konflikt bei gleichzeitiger Aenderung: {0}")]
    Konflikt(String),

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Ungueltiger gespeicherter Wert: {0}")]
    Core(#[from] oya_core::CoreError),

    #[error("Interner DB-Fehler: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn es sich um einen Eindeutigkeitsfehler handelt
    pub fn ist_eindeutigkeit(&self) -> bool {
        matches!(self, Self::Eindeutigkeit(_))
            || matches!(self, Self::Sqlx(e) if ist_unique_verletzung(e))
    }

    /// Gibt true zurueck wenn der Vorgang wiederholt werden darf
    pub fn ist_konflikt(&self) -> bool {
        matches!(self, Self::Konflikt(_))
    }

    /// Bildet einen sqlx-Fehler auf `Eindeutigkeit` ab, falls ein
    /// UNIQUE-Constraint verletzt wurde
    pub(crate) fn aus_sqlx_eindeutig(e: sqlx::Error, meldung: impl Into<String>) -> Self {
        if ist_unique_verletzung(&e) {
            Self::Eindeutigkeit(meldung.into())
        } else {
            Self::Sqlx(e)
        }
    }

    /// Bildet Fehler innerhalb einer Transaktion auf `Konflikt` ab, wenn sie
    /// durch einen parallelen Schreiber entstanden sind
    pub(crate) fn aus_sqlx_transaktion(e: sqlx::Error, kontext: &str) -> Self {
        if ist_unique_verletzung(&e) || ist_gesperrt(&e) {
            Self::Konflikt(format!("{kontext}: {e}"))
        } else {
            Self::Sqlx(e)
        }
    }
}

/// SQLITE_BUSY und SQLITE_LOCKED; erweiterte Codes tragen sie im unteren Byte
const GESPERRT_CODES: [i32; 2] = [5, 6];

fn ist_unique_verletzung(e: &sqlx::Error) -> bool {
    e.as_database_error().is_some_and(|d| d.is_unique_violation())
}

fn ist_gesperrt(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| GESPERRT_CODES.contains(&(code & 0xff)))
}
