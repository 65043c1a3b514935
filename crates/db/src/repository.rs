//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Die SQLite-Implementierungen liegen in
//! [`crate::sqlite`]; Tests koennen eigene In-Memory-Varianten verwenden.

use async_trait::async_trait;
use uuid::Uuid;

use oya_core::ExekutivPosition;

use crate::error::DbError;
use crate::models::*;

/// Result-Alias fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://oya.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://oya.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Credential Store: Mitglieder mit PIN-Hash, Rolle und Status
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<MitgliedRecord>>;
    async fn get_by_serial(&self, serial_number: &str) -> DbResult<Option<MitgliedRecord>>;
    async fn update(&self, id: Uuid, data: MitgliedUpdate) -> DbResult<MitgliedRecord>;
    /// Harter Loeschvorgang
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Alle Mitglieder nach Seriennummer sortiert; `suche` filtert
    /// case-insensitiv auf Name, Seriennummer und Telefonnummer
    async fn list(&self, suche: Option<&str>) -> DbResult<Vec<MitgliedRecord>>;
    async fn count(&self) -> DbResult<i64>;
    async fn update_last_login(&self, id: Uuid) -> DbResult<()>;
}

/// Exekutiv-Besetzungen mit Exklusivitaet pro Position
#[async_trait]
pub trait ExecutiveRepository: Send + Sync {
    /// Besetzt `position` mit `member_id` in einer Transaktion:
    /// bisherigen Inhaber entfernen, Besetzung des Mitglieds anlegen oder
    /// verschieben, Rolle/Position beider Mitglieder nachziehen.
    async fn assign(&self, member_id: Uuid, position: ExekutivPosition)
        -> DbResult<ExekutiveRecord>;
    /// Entfernt eine Besetzung und setzt das Mitglied zurueck
    async fn remove(&self, id: Uuid) -> DbResult<bool>;
    async fn get(&self, id: Uuid) -> DbResult<Option<ExekutiveRecord>>;
    async fn holder_of(&self, position: ExekutivPosition) -> DbResult<Vec<ExekutiveRecord>>;
    /// Nach Position sortiert
    async fn list(&self) -> DbResult<Vec<ExekutiveEintrag>>;
    async fn count(&self) -> DbResult<i64>;
}

/// Amtszeiten; hoechstens eine ist aktiv
#[async_trait]
pub trait TenureRepository: Send + Sync {
    /// Deaktiviert alle Amtszeiten und legt die neue aktiv an (eine Transaktion)
    async fn create_active(&self, data: NeueAmtszeit<'_>) -> DbResult<AmtszeitRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<AmtszeitRecord>>;
    async fn get_active(&self) -> DbResult<Option<AmtszeitRecord>>;
    async fn update(&self, id: Uuid, data: AmtszeitUpdate) -> DbResult<AmtszeitRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Neueste zuerst
    async fn list(&self) -> DbResult<Vec<AmtszeitRecord>>;
}

#[async_trait]
pub trait ContributionRepository: Send + Sync {
    /// Schlaegt mit `Eindeutigkeit` fehl, wenn das Mitglied fuer das Jahr
    /// bereits bezahlt hat
    async fn create(&self, data: NeuerBeitrag) -> DbResult<BeitragRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<BeitragRecord>>;
    async fn update(&self, id: Uuid, data: BeitragUpdate) -> DbResult<BeitragRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Neueste Zahlung zuerst, optional nur fuer ein Mitglied
    async fn list(&self, member_id: Option<Uuid>) -> DbResult<Vec<BeitragRecord>>;
    async fn total(&self, member_id: Option<Uuid>) -> DbResult<i64>;
}

#[async_trait]
pub trait IncomeRepository: Send + Sync {
    async fn create(&self, data: NeueEinnahme) -> DbResult<EinnahmeRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<EinnahmeRecord>>;
    /// Neueste zuerst, optional nur fuer ein Mitglied
    async fn list(&self, member_id: Option<Uuid>) -> DbResult<Vec<EinnahmeRecord>>;
    async fn total(&self, member_id: Option<Uuid>) -> DbResult<i64>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, data: NeueAusgabe) -> DbResult<AusgabeRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<AusgabeRecord>>;
    async fn update(&self, id: Uuid, data: AusgabeUpdate) -> DbResult<AusgabeRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Neueste zuerst, optional nur fuer ein Projekt
    async fn list(&self, project_id: Option<Uuid>) -> DbResult<Vec<AusgabeRecord>>;
    async fn total(&self, project_id: Option<Uuid>) -> DbResult<i64>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, data: ProjektDaten) -> DbResult<ProjektRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<ProjektRecord>>;
    async fn update(&self, id: Uuid, data: ProjektDaten) -> DbResult<ProjektRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    async fn list(&self) -> DbResult<Vec<ProjektRecord>>;
    async fn count(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait TaskForceRepository: Send + Sync {
    async fn create(&self, data: TaskForceDaten) -> DbResult<TaskForceRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<TaskForceRecord>>;
    async fn update(&self, id: Uuid, data: TaskForceDaten) -> DbResult<TaskForceRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    async fn list(&self) -> DbResult<Vec<TaskForceRecord>>;
    async fn count(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait MotorcycleRepository: Send + Sync {
    async fn create(&self, data: MotorradDaten) -> DbResult<MotorradRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<MotorradRecord>>;
    async fn update(&self, id: Uuid, data: MotorradDaten) -> DbResult<MotorradRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    async fn list(&self) -> DbResult<Vec<MotorradRecord>>;
    async fn count(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(
        &self,
        data: AnkuendigungDaten,
        recorded_by: Option<Uuid>,
    ) -> DbResult<AnkuendigungRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<AnkuendigungRecord>>;
    async fn update(&self, id: Uuid, data: AnkuendigungDaten) -> DbResult<AnkuendigungRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Nur aktive, neueste zuerst
    async fn list_active(&self) -> DbResult<Vec<AnkuendigungRecord>>;
    async fn count_active(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait MinutesRepository: Send + Sync {
    async fn create(&self, data: ProtokollDaten, recorded_by: Option<Uuid>)
        -> DbResult<ProtokollRecord>;
    async fn get(&self, id: Uuid) -> DbResult<Option<ProtokollRecord>>;
    async fn update(&self, id: Uuid, data: ProtokollDaten) -> DbResult<ProtokollRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    /// Neuestes Sitzungsdatum zuerst
    async fn list(&self) -> DbResult<Vec<ProtokollRecord>>;
    async fn count(&self) -> DbResult<i64>;
}

/// Persistenter Session-Speicher (Schluessel: SHA-256 des Tokens)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &SessionRecord) -> DbResult<()>;
    async fn get(&self, token_hash: &str) -> DbResult<Option<SessionRecord>>;
    async fn delete(&self, token_hash: &str) -> DbResult<bool>;
    async fn delete_for_member(&self, member_id: Uuid) -> DbResult<u64>;
    async fn delete_expired(&self) -> DbResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert!(cfg.url.starts_with("sqlite://"));
    }
}
