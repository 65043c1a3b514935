//! Datenbankmodelle fuer das OYA-Portal
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Geldbetraege werden durchgehend in Cent (`i64`) gefuehrt.

use chrono::{DateTime, NaiveDate, Utc};
use oya_core::{ExekutivPosition, Mitgliedsstatus, Rolle};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Jahresbeitrag pro Mitglied in Cent (5.000 Einheiten)
pub const JAHRESBEITRAG_CENT: i64 = 500_000;

// ---------------------------------------------------------------------------
// Mitglieder
// ---------------------------------------------------------------------------

/// Mitglieds-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitgliedRecord {
    pub id: Uuid,
    pub serial_number: String,
    pub full_name: String,
    pub phone_number: String,
    /// Gehashte PIN, wird nie nach aussen serialisiert
    #[serde(skip_serializing, default)]
    pub pin_hash: String,
    pub role: Rolle,
    pub executive_position: Option<ExekutivPosition>,
    pub status: Mitgliedsstatus,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl MitgliedRecord {
    pub fn ist_aktiv(&self) -> bool {
        self.status.ist_aktiv()
    }
}

/// Daten zum Erstellen eines neuen Mitglieds
#[derive(Debug, Clone)]
pub struct NeuesMitglied<'a> {
    pub serial_number: &'a str,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    pub pin_hash: &'a str,
    pub role: Rolle,
    pub status: Mitgliedsstatus,
}

/// Daten zum Aktualisieren eines Mitglieds
#[derive(Debug, Clone, Default)]
pub struct MitgliedUpdate {
    pub serial_number: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub pin_hash: Option<String>,
    pub role: Option<Rolle>,
    pub executive_position: Option<Option<ExekutivPosition>>,
    pub status: Option<Mitgliedsstatus>,
    pub last_login: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Exekutive und Amtszeiten
// ---------------------------------------------------------------------------

/// Besetzung einer Exekutiv-Position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExekutiveRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    pub position: ExekutivPosition,
    pub assigned_at: DateTime<Utc>,
}

/// Besetzung inklusive Name und Seriennummer des Mitglieds (fuer Listen)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExekutiveEintrag {
    pub id: Uuid,
    pub member_id: Uuid,
    pub position: ExekutivPosition,
    pub full_name: String,
    pub serial_number: String,
    pub assigned_at: DateTime<Utc>,
}

/// Amtszeit einer Exekutive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmtszeitRecord {
    pub id: Uuid,
    pub name: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NeueAmtszeit<'a> {
    pub name: &'a str,
    pub start_year: i32,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct AmtszeitUpdate {
    pub name: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<Option<i32>>,
}

// ---------------------------------------------------------------------------
// Finanzen
// ---------------------------------------------------------------------------

/// Jahresbeitrag eines Mitglieds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeitragRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    pub year: i32,
    pub amount_paid: i64,
    pub payment_date: NaiveDate,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NeuerBeitrag {
    pub member_id: Uuid,
    pub year: i32,
    pub amount_paid: i64,
    pub payment_date: NaiveDate,
    pub recorded_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct BeitragUpdate {
    pub member_id: Option<Uuid>,
    pub year: Option<i32>,
    pub amount_paid: Option<i64>,
    pub payment_date: Option<NaiveDate>,
}

/// Einnahme oder Spende
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EinnahmeRecord {
    pub id: Uuid,
    pub member_id: Option<Uuid>,
    pub sender_name: String,
    pub sender_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NeueEinnahme {
    pub member_id: Option<Uuid>,
    pub sender_name: String,
    pub sender_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub recorded_by: Option<Uuid>,
}

/// Ausgabe, optional einem Projekt zugeordnet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AusgabeRecord {
    pub id: Uuid,
    pub title: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub project_id: Option<Uuid>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NeueAusgabe {
    pub title: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub project_id: Option<Uuid>,
    pub recorded_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct AusgabeUpdate {
    pub title: Option<String>,
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub project_id: Option<Option<Uuid>>,
}

/// Aggregierte Finanzkennzahlen fuer Dashboards und Listen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanzUebersicht {
    pub beitraege_gesamt: i64,
    pub einnahmen_gesamt: i64,
    /// Beitraege + Einnahmen
    pub geld_gesamt: i64,
    pub ausgaben_gesamt: i64,
    /// Geld gesamt - Ausgaben
    pub saldo: i64,
}

impl FinanzUebersicht {
    pub fn berechnen(beitraege_gesamt: i64, einnahmen_gesamt: i64, ausgaben_gesamt: i64) -> Self {
        let geld_gesamt = beitraege_gesamt + einnahmen_gesamt;
        Self {
            beitraege_gesamt,
            einnahmen_gesamt,
            geld_gesamt,
            ausgaben_gesamt,
            saldo: geld_gesamt - ausgaben_gesamt,
        }
    }
}

// ---------------------------------------------------------------------------
// Projekte
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjektStatus {
    Future,
    Ongoing,
    Completed,
    HandedOver,
    Suspended,
    Abandoned,
}

impl ProjektStatus {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::HandedOver => "handed_over",
            Self::Suspended => "suspended",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::str::FromStr for ProjektStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "future" => Ok(Self::Future),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "handed_over" => Ok(Self::HandedOver),
            "suspended" => Ok(Self::Suspended),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(format!("Unbekannter Projektstatus: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjektRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ProjektStatus,
    pub started_by_tenure: Option<Uuid>,
    pub completed_by_tenure: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Vollstaendiger Projektinhalt (fuer Anlegen und Bearbeiten)
#[derive(Debug, Clone)]
pub struct ProjektDaten {
    pub title: String,
    pub description: String,
    pub status: ProjektStatus,
    pub started_by_tenure: Option<Uuid>,
    pub completed_by_tenure: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Task Force
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskForceRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    pub rank: String,
    pub station: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TaskForceDaten {
    pub member_id: Uuid,
    pub rank: String,
    pub station: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotorradRecord {
    pub id: Uuid,
    pub registration_number: String,
    pub model: String,
    pub assigned_to: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MotorradDaten {
    pub registration_number: String,
    pub model: String,
    pub assigned_to: Option<Uuid>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Ankuendigungen und Protokolle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnkuendigungRecord {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub is_active: bool,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AnkuendigungDaten {
    pub title: String,
    pub message: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtokollRecord {
    pub id: Uuid,
    pub title: String,
    pub meeting_date: NaiveDate,
    pub content: String,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProtokollDaten {
    pub title: String,
    pub meeting_date: NaiveDate,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Persistierte Session (Schluessel ist der SHA-256 des Tokens)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token_hash: String,
    pub member_id: Uuid,
    pub role: Rolle,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finanz_uebersicht_rechnet_saldo() {
        let u = FinanzUebersicht::berechnen(1_000, 500, 300);
        assert_eq!(u.geld_gesamt, 1_500);
        assert_eq!(u.saldo, 1_200);
    }

    #[test]
    fn projektstatus_text() {
        let s: ProjektStatus = "handed_over".parse().unwrap();
        assert_eq!(s, ProjektStatus::HandedOver);
        assert_eq!(s.als_str(), "handed_over");
        assert!("fertig".parse::<ProjektStatus>().is_err());
    }

    #[test]
    fn pin_hash_wird_nicht_serialisiert() {
        let m = MitgliedRecord {
            id: Uuid::new_v4(),
            serial_number: "M001".into(),
            full_name: "Test".into(),
            phone_number: String::new(),
            pin_hash: "geheim".into(),
            role: Rolle::Mitglied,
            executive_position: None,
            status: Mitgliedsstatus::Active,
            created_at: Utc::now(),
            last_login: None,
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(!json.contains("geheim"));
        assert!(!json.contains("pin_hash"));
    }
}
