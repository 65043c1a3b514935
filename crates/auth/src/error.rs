//! Fehlertypen fuer den Auth-Service

use oya_core::Rolle;
use thiserror::Error;

/// Einheitliche Meldung fuer jeden fehlgeschlagenen Login
pub const ANMELDEDATEN_UNGUELTIG: &str = "Invalid serial number or PIN";

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Authentifizierung ---
    /// Unbekannte Seriennummer, falsche PIN oder inaktives Mitglied.
    /// Die Ursache wird nach aussen nie unterschieden.
    #[error("{}", ANMELDEDATEN_UNGUELTIG)]
    UngueltigeAnmeldedaten,

    // --- Session ---
    #[error("Nicht angemeldet oder Session abgelaufen")]
    NichtAuthentifiziert,

    #[error("Zugriff verweigert: Rolle '{benoetigt}' erforderlich")]
    Verboten { benoetigt: Rolle },

    // --- Mitgliederverwaltung ---
    #[error("Mitglied nicht gefunden: {0}")]
    MitgliedNichtGefunden(String),

    #[error("Seriennummer bereits vergeben: {0}")]
    SeriennummerVergeben(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] oya_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Konflikt durch gleichzeitige Aenderung, Wiederholung moeglich
    pub fn ist_konflikt(&self) -> bool {
        matches!(self, Self::Datenbank(e) if e.ist_konflikt())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anmeldefehler_hat_generische_meldung() {
        assert_eq!(
            AuthError::UngueltigeAnmeldedaten.to_string(),
            "Invalid serial number or PIN"
        );
    }

    #[test]
    fn konflikt_aus_datenbank_erkannt() {
        let e = AuthError::from(oya_db::DbError::Konflikt("position".into()));
        assert!(e.ist_konflikt());
        assert!(!AuthError::NichtAuthentifiziert.ist_konflikt());
    }
}
