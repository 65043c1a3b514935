//! Fehlertypen fuer oya-core
//!
//! Entstehen beim Parsen der gespeicherten Textwerte fuer Rollen,
//! Positionen und Status.

use thiserror::Error;

/// Result-Alias fuer oya-core
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Unbekannte Rolle: {0}")]
    UnbekannteRolle(String),

    #[error("Unbekannte Exekutiv-Position: {0}")]
    UnbekanntePosition(String),

    #[error("Unbekannter Mitgliedsstatus: {0}")]
    UnbekannterStatus(String),
}
