//! Gemeinsame Rollen- und Positionstypen fuer das OYA-Portal
//!
//! Die Rollen bilden eine totale Ordnung (`Mitglied < Exekutive < Admin`),
//! die vom Auth-Gate explizit verglichen wird. Die Textwerte entsprechen
//! dem, was in der Datenbank gespeichert ist.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Rollen
// ---------------------------------------------------------------------------

/// Berechtigungsstufe eines Mitglieds
///
/// Die Reihenfolge der Varianten ist die Berechtigungsordnung; `Ord` wird
/// daraus abgeleitet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rolle {
    #[serde(rename = "member")]
    Mitglied,
    #[serde(rename = "executive")]
    Exekutive,
    #[serde(rename = "admin")]
    Admin,
}

impl Rolle {
    /// Alle Rollen in aufsteigender Ordnung
    pub const ALLE: [Rolle; 3] = [Rolle::Mitglied, Rolle::Exekutive, Rolle::Admin];

    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Mitglied => "member",
            Self::Exekutive => "executive",
            Self::Admin => "admin",
        }
    }

    /// Gibt `true` zurueck wenn diese Rolle mindestens `minimum` erreicht
    pub fn erfuellt(&self, minimum: Rolle) -> bool {
        *self >= minimum
    }
}

impl FromStr for Rolle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Mitglied),
            "executive" => Ok(Self::Exekutive),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::UnbekannteRolle(other.to_string())),
        }
    }
}

impl fmt::Display for Rolle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.als_str())
    }
}

// ---------------------------------------------------------------------------
// Exekutiv-Positionen
// ---------------------------------------------------------------------------

/// Benanntes Amt, das hoechstens ein Mitglied gleichzeitig innehat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExekutivPosition {
    Chairman,
    ViceChairman,
    Secretary,
    ViceSecretary,
    Treasurer,
    OrganisingSecretary,
    CommitteeMember,
}

impl ExekutivPosition {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Chairman => "chairman",
            Self::ViceChairman => "vice_chairman",
            Self::Secretary => "secretary",
            Self::ViceSecretary => "vice_secretary",
            Self::Treasurer => "treasurer",
            Self::OrganisingSecretary => "organising_secretary",
            Self::CommitteeMember => "committee_member",
        }
    }

    /// Anzeigename des Amtes
    pub fn bezeichnung(&self) -> &'static str {
        match self {
            Self::Chairman => "Chairman",
            Self::ViceChairman => "Vice Chairman",
            Self::Secretary => "Secretary",
            Self::ViceSecretary => "Vice Secretary",
            Self::Treasurer => "Treasurer",
            Self::OrganisingSecretary => "Organising Secretary",
            Self::CommitteeMember => "Committee Member",
        }
    }
}

impl FromStr for ExekutivPosition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chairman" => Ok(Self::Chairman),
            "vice_chairman" => Ok(Self::ViceChairman),
            "secretary" => Ok(Self::Secretary),
            "vice_secretary" => Ok(Self::ViceSecretary),
            "treasurer" => Ok(Self::Treasurer),
            "organising_secretary" => Ok(Self::OrganisingSecretary),
            "committee_member" => Ok(Self::CommitteeMember),
            other => Err(CoreError::UnbekanntePosition(other.to_string())),
        }
    }
}

impl fmt::Display for ExekutivPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bezeichnung())
    }
}

// ---------------------------------------------------------------------------
// Mitgliedsstatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mitgliedsstatus {
    Active,
    Inactive,
}

impl Mitgliedsstatus {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn ist_aktiv(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for Mitgliedsstatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::UnbekannterStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollen_sind_total_geordnet() {
        assert!(Rolle::Mitglied < Rolle::Exekutive);
        assert!(Rolle::Exekutive < Rolle::Admin);
        assert!(Rolle::Mitglied < Rolle::Admin);
    }

    #[test]
    fn rolle_erfuellt_minimum() {
        for (i, rolle) in Rolle::ALLE.iter().enumerate() {
            for (j, minimum) in Rolle::ALLE.iter().enumerate() {
                assert_eq!(rolle.erfuellt(*minimum), i >= j, "{rolle} vs {minimum}");
            }
        }
    }

    #[test]
    fn rolle_text_rundlauf() {
        for rolle in Rolle::ALLE {
            assert_eq!(rolle.als_str().parse::<Rolle>().unwrap(), rolle);
        }
        assert!(matches!(
            "superuser".parse::<Rolle>(),
            Err(CoreError::UnbekannteRolle(_))
        ));
    }

    #[test]
    fn rolle_serde_nutzt_gespeicherte_werte() {
        let json = serde_json::to_string(&Rolle::Exekutive).unwrap();
        assert_eq!(json, "\"executive\"");
    }

    #[test]
    fn position_parsen_und_anzeige() {
        let pos: ExekutivPosition = "vice_chairman".parse().unwrap();
        assert_eq!(pos, ExekutivPosition::ViceChairman);
        assert_eq!(pos.to_string(), "Vice Chairman");
        assert!("king".parse::<ExekutivPosition>().is_err());
    }

    #[test]
    fn status_parsen() {
        assert!("active".parse::<Mitgliedsstatus>().unwrap().ist_aktiv());
        assert!(!"inactive".parse::<Mitgliedsstatus>().unwrap().ist_aktiv());
    }
}
