//! Auth-Service fuer das OYA-Portal
//!
//! Login-Zustandsmaschine: ANONYM -> PRUEFUNG -> ANGEMELDET -> ANONYM.
//! Nutzt das MemberRepository als Credential Store und einen beliebigen
//! [`SessionStore`].

use std::sync::Arc;

use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::{
    models::{MitgliedRecord, MitgliedUpdate, NeuesMitglied},
    MemberRepository,
};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    gate::Sitzung,
    password::{PinHasher, STANDARD_ITERATIONEN},
    session::{Session, SessionStore, STANDARD_SESSION_TTL_STUNDEN},
};

/// Einstellungen des Auth-Service
#[derive(Debug, Clone, Copy)]
pub struct AuthKonfig {
    pub pbkdf2_iterationen: u32,
    pub session_ttl_stunden: i64,
}

impl Default for AuthKonfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterationen: STANDARD_ITERATIONEN,
            session_ttl_stunden: STANDARD_SESSION_TTL_STUNDEN,
        }
    }
}

/// Ergebnis eines erfolgreichen Logins
#[derive(Debug, Clone)]
pub struct Anmeldung {
    pub mitglied: MitgliedRecord,
    pub session: Session,
}

/// Eingaben fuer ein neues Mitglied (PIN im Klartext)
#[derive(Debug, Clone)]
pub struct MitgliedAnlegen<'a> {
    pub serial_number: &'a str,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    pub pin: &'a str,
    pub role: Rolle,
    pub status: Mitgliedsstatus,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService {
    mitglieder: Arc<dyn MemberRepository>,
    sessions: Arc<dyn SessionStore>,
    hasher: PinHasher,
    session_ttl: chrono::Duration,
    /// Vergleichshash fuer unbekannte Seriennummern
    dummy_hash: String,
}

impl AuthService {
    pub fn neu(
        mitglieder: Arc<dyn MemberRepository>,
        sessions: Arc<dyn SessionStore>,
        konfig: AuthKonfig,
    ) -> Self {
        let hasher = PinHasher::neu(konfig.pbkdf2_iterationen);
        let dummy_hash = hasher.hashen("oya-dummy-pin");
        Self {
            mitglieder,
            sessions,
            hasher,
            session_ttl: chrono::Duration::hours(konfig.session_ttl_stunden.max(1)),
            dummy_hash,
        }
    }

    pub fn hasher(&self) -> &PinHasher {
        &self.hasher
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Meldet ein Mitglied mit Seriennummer und PIN an
    ///
    /// Unbekannte Seriennummer, falsche PIN und inaktives Mitglied liefern
    /// denselben Fehler. Ein Legacy-Hash wird nach erfolgreichem Login durch
    /// das aktuelle Format ersetzt.
    pub async fn anmelden(&self, serial_number: &str, pin: &str) -> AuthResult<Anmeldung> {
        let serial_number = serial_number.trim();
        let pin = pin.trim();

        let mitglied = if serial_number.is_empty() {
            None
        } else {
            self.mitglieder.get_by_serial(serial_number).await?
        };

        let Some(mitglied) = mitglied else {
            // Gleicher Rechenaufwand wie bei bekannter Seriennummer
            let _ = self.hasher.verifizieren(pin, &self.dummy_hash);
            tracing::warn!(seriennummer = %serial_number, "Login mit unbekannter Seriennummer");
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        if !self.hasher.verifizieren(pin, &mitglied.pin_hash) {
            tracing::warn!(member_id = %mitglied.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        if !mitglied.ist_aktiv() {
            tracing::warn!(member_id = %mitglied.id, "Login eines inaktiven Mitglieds abgelehnt");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        self.mitglieder.update_last_login(mitglied.id).await?;

        if self.hasher.braucht_upgrade(&mitglied.pin_hash) {
            let neuer_hash = self.hasher.hashen(pin);
            match self
                .mitglieder
                .update(
                    mitglied.id,
                    MitgliedUpdate {
                        pin_hash: Some(neuer_hash),
                        ..Default::default()
                    },
                )
                .await
            {
                Ok(_) => tracing::info!(member_id = %mitglied.id, "PIN-Hash auf aktuelles Format gehoben"),
                Err(e) => {
                    tracing::warn!(member_id = %mitglied.id, fehler = %e, "PIN-Hash-Upgrade fehlgeschlagen")
                }
            }
        }

        let session = Session::neu(mitglied.id, mitglied.role, self.session_ttl);
        self.sessions.speichern(&session).await?;

        tracing::info!(
            member_id = %mitglied.id,
            seriennummer = %mitglied.serial_number,
            rolle = %mitglied.role,
            "Mitglied angemeldet"
        );

        Ok(Anmeldung { mitglied, session })
    }

    /// Zerstoert die Session; unbekannte Tokens sind kein Fehler
    pub async fn abmelden(&self, token: &str) -> AuthResult<()> {
        self.sessions.loeschen(token).await?;
        tracing::debug!("Session invalidiert (Abmeldung)");
        Ok(())
    }

    /// Loest ein Token in das aktuelle Mitglied auf
    ///
    /// Verweist die Session auf ein geloeschtes oder inaktives Mitglied,
    /// wird sie entfernt und `NichtAuthentifiziert` geliefert.
    pub async fn session_validieren(&self, token: &str) -> AuthResult<Sitzung> {
        let session = self
            .sessions
            .laden(token)
            .await?
            .ok_or(AuthError::NichtAuthentifiziert)?;

        let mitglied = match self.mitglieder.get_by_id(session.member_id).await? {
            Some(m) if m.ist_aktiv() => m,
            Some(m) => {
                tracing::info!(member_id = %m.id, "Session eines inaktiven Mitglieds verworfen");
                self.sessions.loeschen(token).await?;
                return Err(AuthError::NichtAuthentifiziert);
            }
            None => {
                tracing::warn!(member_id = %session.member_id, "Verwaiste Session verworfen");
                self.sessions.loeschen(token).await?;
                return Err(AuthError::NichtAuthentifiziert);
            }
        };

        Ok(Sitzung {
            token: session.token,
            mitglied,
        })
    }

    /// Legt ein Mitglied an; die PIN wird im aktuellen Format gehasht
    pub async fn mitglied_anlegen(&self, eingabe: MitgliedAnlegen<'_>) -> AuthResult<MitgliedRecord> {
        let serial_number = eingabe.serial_number.trim();
        let full_name = eingabe.full_name.trim();
        let pin = eingabe.pin.trim();

        if serial_number.is_empty() {
            return Err(AuthError::UngueltigeEingabe("Seriennummer fehlt".into()));
        }
        if full_name.is_empty() {
            return Err(AuthError::UngueltigeEingabe("Name fehlt".into()));
        }
        if pin.is_empty() {
            return Err(AuthError::UngueltigeEingabe("PIN fehlt".into()));
        }

        let pin_hash = self.hasher.hashen(pin);
        let mitglied = self
            .mitglieder
            .create(NeuesMitglied {
                serial_number,
                full_name,
                phone_number: eingabe.phone_number.trim(),
                pin_hash: &pin_hash,
                role: eingabe.role,
                status: eingabe.status,
            })
            .await
            .map_err(|e| {
                if e.ist_eindeutigkeit() {
                    AuthError::SeriennummerVergeben(serial_number.to_string())
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        tracing::info!(
            member_id = %mitglied.id,
            seriennummer = %mitglied.serial_number,
            rolle = %mitglied.role,
            "Neues Mitglied angelegt"
        );
        Ok(mitglied)
    }

    /// Administratives Zuruecksetzen der PIN; beendet alle Sessions des Mitglieds
    pub async fn pin_zuruecksetzen(&self, member_id: Uuid, neue_pin: &str) -> AuthResult<()> {
        let neue_pin = neue_pin.trim();
        if neue_pin.is_empty() {
            return Err(AuthError::UngueltigeEingabe("PIN fehlt".into()));
        }

        self.mitglieder
            .get_by_id(member_id)
            .await?
            .ok_or_else(|| AuthError::MitgliedNichtGefunden(member_id.to_string()))?;

        self.mitglieder
            .update(
                member_id,
                MitgliedUpdate {
                    pin_hash: Some(self.hasher.hashen(neue_pin)),
                    ..Default::default()
                },
            )
            .await?;

        let anzahl = self.sessions.mitglied_abmelden(member_id).await?;
        tracing::info!(
            member_id = %member_id,
            invalidierte_sessions = anzahl,
            "PIN zurueckgesetzt, Sessions invalidiert"
        );
        Ok(())
    }

    /// Loescht ein Mitglied hart und beendet seine Sessions
    pub async fn mitglied_loeschen(&self, member_id: Uuid) -> AuthResult<bool> {
        let geloescht = self.mitglieder.delete(member_id).await?;
        if geloescht {
            let anzahl = self.sessions.mitglied_abmelden(member_id).await?;
            tracing::info!(member_id = %member_id, invalidierte_sessions = anzahl, "Mitglied geloescht");
        }
        Ok(geloescht)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use oya_db::{DbError, DbResult};

    use crate::gate::rolle_erfordern;
    use crate::session::SpeicherSessionStore;

    const LEGACY_123456: &str = "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92";

    // Minimaler In-Memory MemberRepository fuer Tests
    #[derive(Default)]
    struct TestMitglieder {
        mitglieder: Mutex<Vec<MitgliedRecord>>,
    }

    impl TestMitglieder {
        fn hash_von(&self, id: Uuid) -> String {
            self.mitglieder
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.pin_hash.clone())
                .unwrap()
        }
    }

    #[async_trait]
    impl MemberRepository for TestMitglieder {
        async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
            let mut mitglieder = self.mitglieder.lock().unwrap();
            if mitglieder.iter().any(|m| m.serial_number == data.serial_number) {
                return Err(DbError::Eindeutigkeit(data.serial_number.to_string()));
            }
            let record = MitgliedRecord {
                id: Uuid::new_v4(),
                serial_number: data.serial_number.to_string(),
                full_name: data.full_name.to_string(),
                phone_number: data.phone_number.to_string(),
                pin_hash: data.pin_hash.to_string(),
                role: data.role,
                executive_position: None,
                status: data.status,
                created_at: Utc::now(),
                last_login: None,
            };
            mitglieder.push(record.clone());
            Ok(record)
        }

        async fn get_by_id(&self, id: Uuid) -> DbResult<Option<MitgliedRecord>> {
            Ok(self.mitglieder.lock().unwrap().iter().find(|m| m.id == id).cloned())
        }

        async fn get_by_serial(&self, serial_number: &str) -> DbResult<Option<MitgliedRecord>> {
            Ok(self
                .mitglieder
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.serial_number == serial_number)
                .cloned())
        }

        async fn update(&self, id: Uuid, data: MitgliedUpdate) -> DbResult<MitgliedRecord> {
            let mut mitglieder = self.mitglieder.lock().unwrap();
            let m = mitglieder
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| DbError::nicht_gefunden(id.to_string()))?;
            if let Some(hash) = data.pin_hash {
                m.pin_hash = hash;
            }
            if let Some(status) = data.status {
                m.status = status;
            }
            if let Some(rolle) = data.role {
                m.role = rolle;
            }
            Ok(m.clone())
        }

        async fn delete(&self, id: Uuid) -> DbResult<bool> {
            let mut mitglieder = self.mitglieder.lock().unwrap();
            let vorher = mitglieder.len();
            mitglieder.retain(|m| m.id != id);
            Ok(mitglieder.len() < vorher)
        }

        async fn list(&self, _suche: Option<&str>) -> DbResult<Vec<MitgliedRecord>> {
            Ok(self.mitglieder.lock().unwrap().clone())
        }

        async fn count(&self) -> DbResult<i64> {
            Ok(self.mitglieder.lock().unwrap().len() as i64)
        }

        async fn update_last_login(&self, id: Uuid) -> DbResult<()> {
            if let Some(m) = self.mitglieder.lock().unwrap().iter_mut().find(|m| m.id == id) {
                m.last_login = Some(Utc::now());
            }
            Ok(())
        }
    }

    fn test_service() -> (AuthService, Arc<TestMitglieder>) {
        let repo = Arc::new(TestMitglieder::default());
        let service = AuthService::neu(
            repo.clone(),
            SpeicherSessionStore::neu(),
            AuthKonfig {
                pbkdf2_iterationen: 1_000,
                session_ttl_stunden: 1,
            },
        );
        (service, repo)
    }

    async fn anlegen(service: &AuthService, serial: &str, pin: &str, rolle: Rolle) -> MitgliedRecord {
        service
            .mitglied_anlegen(MitgliedAnlegen {
                serial_number: serial,
                full_name: "Test Mitglied",
                phone_number: "",
                pin,
                role: rolle,
                status: Mitgliedsstatus::Active,
            })
            .await
            .expect("Mitglied anlegen fehlgeschlagen")
    }

    #[tokio::test]
    async fn anmelden_und_session_validieren() {
        let (service, _) = test_service();
        let m = anlegen(&service, "M001", "123456", Rolle::Mitglied).await;

        let anmeldung = service.anmelden("M001", "123456").await.unwrap();
        assert_eq!(anmeldung.mitglied.id, m.id);
        assert_eq!(anmeldung.session.rolle, Rolle::Mitglied);

        let sitzung = service.session_validieren(&anmeldung.session.token).await.unwrap();
        assert_eq!(sitzung.mitglied.id, m.id);
        assert!(sitzung.mitglied.last_login.is_some());
    }

    #[tokio::test]
    async fn eingaben_werden_getrimmt() {
        let (service, _) = test_service();
        anlegen(&service, "M002", "4321", Rolle::Mitglied).await;
        assert!(service.anmelden("  M002 ", " 4321\n").await.is_ok());
    }

    #[tokio::test]
    async fn fehlermeldung_verraet_keine_seriennummern() {
        let (service, _) = test_service();
        anlegen(&service, "M001", "123456", Rolle::Mitglied).await;

        let unbekannt = service.anmelden("GIBTSNICHT", "123456").await.unwrap_err();
        let falsche_pin = service.anmelden("M001", "000000").await.unwrap_err();
        let leer = service.anmelden("", "").await.unwrap_err();

        assert!(matches!(unbekannt, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(falsche_pin, AuthError::UngueltigeAnmeldedaten));
        assert_eq!(unbekannt.to_string(), falsche_pin.to_string());
        assert_eq!(leer.to_string(), "Invalid serial number or PIN");
    }

    #[tokio::test]
    async fn inaktives_mitglied_kann_sich_nicht_anmelden() {
        let (service, repo) = test_service();
        let m = anlegen(&service, "M003", "1111", Rolle::Admin).await;
        repo.update(
            m.id,
            MitgliedUpdate {
                status: Some(Mitgliedsstatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = service.anmelden("M003", "1111").await.unwrap_err();
        assert!(matches!(err, AuthError::UngueltigeAnmeldedaten));
    }

    #[tokio::test]
    async fn legacy_hash_wird_beim_login_ersetzt() {
        let (service, repo) = test_service();
        let m = repo
            .create(NeuesMitglied {
                serial_number: "ALT1",
                full_name: "Altbestand",
                phone_number: "",
                pin_hash: LEGACY_123456,
                role: Rolle::Mitglied,
                status: Mitgliedsstatus::Active,
            })
            .await
            .unwrap();

        service.anmelden("ALT1", "123456").await.unwrap();
        let neuer_hash = repo.hash_von(m.id);
        assert!(neuer_hash.starts_with("pbkdf2_sha256$1000$"));
        assert!(service.hasher().verifizieren("123456", &neuer_hash));

        // Zweiter Login kodiert nicht erneut
        service.anmelden("ALT1", "123456").await.unwrap();
        assert_eq!(repo.hash_von(m.id), neuer_hash);
    }

    #[tokio::test]
    async fn abmelden_invalidiert_session() {
        let (service, _) = test_service();
        anlegen(&service, "M004", "2222", Rolle::Mitglied).await;
        let anmeldung = service.anmelden("M004", "2222").await.unwrap();

        service.abmelden(&anmeldung.session.token).await.unwrap();
        let err = service
            .session_validieren(&anmeldung.session.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NichtAuthentifiziert));

        // Doppeltes Abmelden ist kein Fehler
        service.abmelden(&anmeldung.session.token).await.unwrap();
    }

    #[tokio::test]
    async fn geloeschtes_mitglied_verliert_session() {
        let (service, repo) = test_service();
        let m = anlegen(&service, "M005", "3333", Rolle::Admin).await;
        let anmeldung = service.anmelden("M005", "3333").await.unwrap();

        // Direkt im Store loeschen: Session bleibt zunaechst liegen
        repo.delete(m.id).await.unwrap();

        let err = service
            .session_validieren(&anmeldung.session.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NichtAuthentifiziert));
        assert!(service
            .sessions()
            .laden(&anmeldung.session.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn mitglied_ohne_adminrolle_wird_verboten() {
        let (service, _) = test_service();
        anlegen(&service, "M001", "123456", Rolle::Mitglied).await;
        let anmeldung = service.anmelden("M001", "123456").await.unwrap();

        let sitzung = service.session_validieren(&anmeldung.session.token).await.unwrap();
        let err = rolle_erfordern(&sitzung, Rolle::Admin).unwrap_err();
        assert!(matches!(err, AuthError::Verboten { .. }));
    }

    #[tokio::test]
    async fn doppelte_seriennummer_abgelehnt() {
        let (service, _) = test_service();
        anlegen(&service, "M006", "1", Rolle::Mitglied).await;
        let err = service
            .mitglied_anlegen(MitgliedAnlegen {
                serial_number: "M006",
                full_name: "Zweiter",
                phone_number: "",
                pin: "2",
                role: Rolle::Mitglied,
                status: Mitgliedsstatus::Active,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SeriennummerVergeben(_)));
    }

    #[tokio::test]
    async fn pin_reset_beendet_sessions() {
        let (service, repo) = test_service();
        let m = anlegen(&service, "M007", "alt", Rolle::Mitglied).await;
        let anmeldung = service.anmelden("M007", "alt").await.unwrap();

        service.pin_zuruecksetzen(m.id, "neu").await.unwrap();

        assert!(service.session_validieren(&anmeldung.session.token).await.is_err());
        assert!(service.anmelden("M007", "alt").await.is_err());
        assert!(service.anmelden("M007", "neu").await.is_ok());
        assert!(repo.hash_von(m.id).starts_with("pbkdf2_sha256$"));
    }

    #[tokio::test]
    async fn mitglied_loeschen_beendet_sessions() {
        let (service, _) = test_service();
        let m = anlegen(&service, "M008", "8888", Rolle::Mitglied).await;
        let anmeldung = service.anmelden("M008", "8888").await.unwrap();

        assert!(service.mitglied_loeschen(m.id).await.unwrap());
        assert!(service
            .sessions()
            .laden(&anmeldung.session.token)
            .await
            .unwrap()
            .is_none());
    }
}
