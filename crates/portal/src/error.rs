//! Fehlertypen fuer die Portal-API und ihre HTTP-Abbildung

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use oya_auth::{AuthError, ANMELDEDATEN_UNGUELTIG};
use oya_core::Rolle;
use oya_db::DbError;
use serde_json::json;
use thiserror::Error;

use crate::rest::middleware::fehler_antwort;

/// Ziel der Weiterleitung bei fehlender Session
pub const LOGIN_PFAD: &str = "/login";

/// Alle Fehler, die ein Handler nach aussen geben kann
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{}", ANMELDEDATEN_UNGUELTIG)]
    UngueltigeAnmeldedaten,

    #[error("Nicht angemeldet oder Session abgelaufen")]
    NichtAuthentifiziert,

    #[error("Zugriff verweigert: Rolle '{0}' erforderlich")]
    Verboten(Rolle),

    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    /// Gleichzeitige Aenderung, der Client darf wiederholen
    #[error("Konflikt bei gleichzeitiger Aenderung, bitte erneut versuchen")]
    Konflikt(String),

    /// Verletzte Eindeutigkeit; die Meldung ist fuer den Benutzer bestimmt
    #[error("{0}")]
    Doppelt(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    pub fn nicht_gefunden(was: impl Into<String>) -> Self {
        Self::NichtGefunden(was.into())
    }

    pub fn ungueltig(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// HTTP-Statuscode fuer REST-Fehler
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeAnmeldedaten => StatusCode::UNAUTHORIZED,
            Self::NichtAuthentifiziert => StatusCode::SEE_OTHER,
            Self::Verboten(_) => StatusCode::FORBIDDEN,
            Self::NichtGefunden(_) => StatusCode::NOT_FOUND,
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::Konflikt(_) | Self::Doppelt(_) => StatusCode::CONFLICT,
            Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for PortalError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NichtGefunden(was) => Self::NichtGefunden(was),
            DbError::Eindeutigkeit(msg) => Self::Doppelt(msg),
            DbError::Konflikt(msg) => Self::Konflikt(msg),
            andere => Self::Intern(andere.to_string()),
        }
    }
}

impl From<AuthError> for PortalError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UngueltigeAnmeldedaten => Self::UngueltigeAnmeldedaten,
            AuthError::NichtAuthentifiziert => Self::NichtAuthentifiziert,
            AuthError::Verboten { benoetigt } => Self::Verboten(benoetigt),
            AuthError::MitgliedNichtGefunden(id) => Self::NichtGefunden(format!("Mitglied {id}")),
            AuthError::SeriennummerVergeben(serial) => {
                Self::Doppelt(format!("Serial number '{serial}' is already taken."))
            }
            AuthError::UngueltigeEingabe(msg) => Self::UngueltigeEingabe(msg),
            AuthError::Datenbank(db) => db.into(),
            AuthError::Intern(msg) => Self::Intern(msg),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        match &self {
            Self::NichtAuthentifiziert => {
                let mut antwort = fehler_antwort(status, &self.to_string());
                antwort
                    .headers_mut()
                    .insert(header::LOCATION, header::HeaderValue::from_static(LOGIN_PFAD));
                antwort
            }
            Self::Konflikt(detail) => {
                tracing::warn!(detail = %detail, "Schreibkonflikt");
                (
                    status,
                    Json(json!({
                        "error": {
                            "code": status.as_u16(),
                            "message": self.to_string(),
                            "retryable": true
                        }
                    })),
                )
                    .into_response()
            }
            Self::Intern(detail) => {
                tracing::error!(fehler = %detail, "Interner Fehler im Handler");
                fehler_antwort(status, "Interner Serverfehler")
            }
            _ => fehler_antwort(status, &self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_abbildung() {
        assert_eq!(PortalError::UngueltigeAnmeldedaten.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(PortalError::NichtAuthentifiziert.http_status(), StatusCode::SEE_OTHER);
        assert_eq!(PortalError::Verboten(Rolle::Admin).http_status(), StatusCode::FORBIDDEN);
        assert_eq!(PortalError::Konflikt("x".into()).http_status(), StatusCode::CONFLICT);
        assert_eq!(PortalError::Doppelt("x".into()).http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn nicht_authentifiziert_leitet_auf_login() {
        let antwort = PortalError::NichtAuthentifiziert.into_response();
        assert_eq!(antwort.status(), StatusCode::SEE_OTHER);
        assert_eq!(antwort.headers()[header::LOCATION], LOGIN_PFAD);
    }

    #[test]
    fn auth_fehler_werden_abgebildet() {
        let e: PortalError = AuthError::Verboten { benoetigt: Rolle::Admin }.into();
        assert!(matches!(e, PortalError::Verboten(Rolle::Admin)));

        let e: PortalError = AuthError::Datenbank(DbError::Konflikt("position".into())).into();
        assert!(matches!(e, PortalError::Konflikt(_)));

        let e: PortalError = AuthError::SeriennummerVergeben("M001".into()).into();
        assert_eq!(e.http_status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn konflikt_ist_wiederholbar() {
        let e: PortalError = DbError::Konflikt("Exekutiv-Position zuweisen".into()).into();
        let antwort = e.into_response();
        assert_eq!(antwort.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(antwort.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], 409);
        assert_eq!(json["error"]["retryable"], true);
        // Interne Details bleiben im Log
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Exekutiv-Position"));
    }

    #[test]
    fn eindeutigkeit_behaelt_meldung() {
        let e: PortalError = DbError::Eindeutigkeit("schon bezahlt".into()).into();
        assert_eq!(e.to_string(), "schon bezahlt");
    }
}
