//! oya-auth – Authentifizierung und Autorisierung
//!
//! Dieses Crate implementiert:
//! - PIN-Hashing (PBKDF2-SHA256, Verifikation von Legacy-SHA-256)
//! - Session-Management (in-memory oder persistent, mit TTL)
//! - AuthService (Login, Logout, Session-Aufloesung, Mitglieder anlegen)
//! - Auth Gate (`sitzung_erfordern`, `rolle_erfordern`)
//! - VerwaltungService (Exekutiv-Positionen, Amtszeiten)

pub mod error;
pub mod gate;
pub mod password;
pub mod service;
pub mod session;
pub mod verwaltung;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult, ANMELDEDATEN_UNGUELTIG};
pub use gate::{rolle_erfordern, sitzung_erfordern, Sitzung};
pub use password::{HashFormat, PinHasher};
pub use service::{Anmeldung, AuthKonfig, AuthService, MitgliedAnlegen};
pub use session::{
    cleanup_starten, DbSessionStore, Session, SessionStore, SpeicherSessionStore,
};
pub use verwaltung::VerwaltungService;
