//! oya-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Session Store, Auth-Services und den
//! Portal-REST-Server.

pub mod config;

use std::sync::Arc;

use anyhow::Result;
use config::{ServerConfig, SessionBackend};
use oya_auth::{
    cleanup_starten, session::CLEANUP_INTERVALL, AuthKonfig, AuthService, DbSessionStore,
    MitgliedAnlegen, SessionStore, SpeicherSessionStore, VerwaltungService,
};
use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::{DatabaseConfig, MemberRepository, SqliteDb};
use oya_portal::{CookieKonfig, PortalState, RestServer, RestServerKonfig};

/// Erst-Admin aus der Umgebung (`OYA_ADMIN_SERIAL`, `OYA_ADMIN_PIN`, `OYA_ADMIN_NAME`)
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub serial_number: String,
    pub pin: String,
    pub full_name: String,
}

impl AdminBootstrap {
    /// Liefert `None` wenn Seriennummer oder PIN fehlen
    pub fn aus_umgebung() -> Option<Self> {
        let serial_number = std::env::var("OYA_ADMIN_SERIAL").ok()?;
        let pin = std::env::var("OYA_ADMIN_PIN").ok()?;
        if serial_number.trim().is_empty() || pin.is_empty() {
            return None;
        }
        Some(Self {
            serial_number: serial_number.trim().to_string(),
            pin,
            full_name: std::env::var("OYA_ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
        })
    }

    /// Legt den Admin an, falls die Seriennummer noch frei ist.
    /// Gibt `true` zurueck wenn ein Mitglied angelegt wurde.
    pub async fn anwenden(
        &self,
        auth: &AuthService,
        mitglieder: &dyn MemberRepository,
    ) -> Result<bool> {
        if mitglieder.get_by_serial(&self.serial_number).await?.is_some() {
            tracing::debug!(seriennummer = %self.serial_number, "Admin existiert bereits");
            return Ok(false);
        }
        let admin = auth
            .mitglied_anlegen(MitgliedAnlegen {
                serial_number: &self.serial_number,
                full_name: &self.full_name,
                phone_number: "",
                pin: &self.pin,
                role: Rolle::Admin,
                status: Mitgliedsstatus::Active,
            })
            .await?;
        tracing::info!(member_id = %admin.id, seriennummer = %admin.serial_number, "Admin angelegt");
        Ok(true)
    }
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen (Migrationen laufen dabei)
    /// 2. Session Store waehlen und Cleanup-Task starten
    /// 3. Optional den Erst-Admin anlegen
    /// 4. REST-API starten und auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let bind_addr = self.config.bind_adresse()?;
        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %bind_addr,
            "Server startet"
        );

        let db = Arc::new(
            SqliteDb::oeffnen(&DatabaseConfig {
                url: self.config.datenbank.url.clone(),
                max_verbindungen: self.config.datenbank.max_verbindungen,
                sqlite_wal: self.config.datenbank.wal,
            })
            .await?,
        );
        tracing::info!(url = %self.config.datenbank.url, "Datenbank geoeffnet");

        let sessions: Arc<dyn SessionStore> = match self.config.sicherheit.session_backend {
            SessionBackend::Speicher => SpeicherSessionStore::neu(),
            SessionBackend::Datenbank => DbSessionStore::neu(Arc::clone(&db)),
        };
        let cleanup = cleanup_starten(Arc::clone(&sessions), CLEANUP_INTERVALL);

        let auth = Arc::new(AuthService::neu(
            db.clone(),
            sessions,
            AuthKonfig {
                pbkdf2_iterationen: self.config.sicherheit.pbkdf2_iterationen,
                session_ttl_stunden: self.config.sicherheit.session_ttl_stunden,
            },
        ));
        let verwaltung = Arc::new(VerwaltungService::neu(db.clone(), db.clone()));

        if let Some(bootstrap) = AdminBootstrap::aus_umgebung() {
            bootstrap.anwenden(&auth, db.as_ref()).await?;
        }

        let state = PortalState::neu(
            Arc::clone(&db),
            auth,
            verwaltung,
            CookieKonfig {
                name: self.config.sicherheit.cookie_name.clone(),
                secure: self.config.sicherheit.cookie_secure,
            },
        );

        let ergebnis = RestServer::neu(RestServerKonfig {
            bind_addr,
            cors_origins: self.config.server.cors_origins.clone(),
        })
        .starten(state)
        .await;

        cleanup.abort();
        db.schliessen().await;
        tracing::info!("Server beendet");
        ergebnis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn auth_mit_db() -> (Arc<SqliteDb>, AuthService) {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let auth = AuthService::neu(
            db.clone(),
            SpeicherSessionStore::neu(),
            AuthKonfig {
                pbkdf2_iterationen: 1_000,
                session_ttl_stunden: 1,
            },
        );
        (db, auth)
    }

    #[tokio::test]
    async fn bootstrap_legt_admin_einmal_an() {
        let (db, auth) = auth_mit_db().await;
        let bootstrap = AdminBootstrap {
            serial_number: "ADMIN-1".into(),
            pin: "246810".into(),
            full_name: "Erster Admin".into(),
        };

        assert!(bootstrap.anwenden(&auth, db.as_ref()).await.unwrap());
        assert!(!bootstrap.anwenden(&auth, db.as_ref()).await.unwrap());

        let admin = db.get_by_serial("ADMIN-1").await.unwrap().unwrap();
        assert_eq!(admin.role, Rolle::Admin);

        let anmeldung = auth.anmelden("ADMIN-1", "246810").await.unwrap();
        assert_eq!(anmeldung.mitglied.id, admin.id);
    }
}
