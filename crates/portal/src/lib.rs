//! oya-portal – REST-API des OYA-Portals
//!
//! Stellt die Verwaltungsfunktionen als JSON-over-HTTP bereit:
//! - Login/Logout mit Session-Cookie oder Bearer-Token
//! - Mitglieder, Exekutive und Amtszeiten
//! - Beitraege, Einnahmen, Ausgaben, Projekte
//! - Task Force, Ankuendigungen, Sitzungsprotokolle, Dashboards
//!
//! Das Auth Gate ist als axum-Extractor umgesetzt (`AktiveSitzung`,
//! `AdminSitzung`).

pub mod error;
pub mod rest;

pub use error::{PortalError, PortalResult};
pub use rest::{
    server::app, CookieKonfig, PortalState, RestServer, RestServerKonfig, STANDARD_COOKIE_NAME,
};
