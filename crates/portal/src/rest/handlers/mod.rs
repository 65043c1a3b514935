//! REST-Handler Module

pub mod auth;
pub mod dashboard;
pub mod executives;
pub mod finance;
pub mod members;
pub mod notices;
pub mod projects;
pub mod taskforce;

use crate::error::{PortalError, PortalResult};

/// Getrimmter Pflichttext; leer ist ein Eingabefehler
pub(crate) fn pflichtfeld(wert: &str, feld: &str) -> PortalResult<String> {
    let wert = wert.trim();
    if wert.is_empty() {
        return Err(PortalError::ungueltig(format!("{feld} fehlt")));
    }
    Ok(wert.to_string())
}

/// Geldbetraege in Cent muessen positiv sein
pub(crate) fn betrag_pruefen(betrag: i64) -> PortalResult<()> {
    if betrag <= 0 {
        return Err(PortalError::ungueltig(format!(
            "Betrag muss positiv sein (erhalten: {betrag})"
        )));
    }
    Ok(())
}

/// Leere optionale Texte werden zu `None`
pub(crate) fn optionaler_text(wert: Option<String>) -> Option<String> {
    wert.map(|w| w.trim().to_string()).filter(|w| !w.is_empty())
}
