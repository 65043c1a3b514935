//! oya-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die von allen anderen
//! OYA-Crates gemeinsam genutzt werden: die Rollen-Ordnung, die
//! Exekutiv-Positionen und der Mitgliedsstatus.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{CoreError, CoreResult};
pub use types::{ExekutivPosition, Mitgliedsstatus, Rolle};
