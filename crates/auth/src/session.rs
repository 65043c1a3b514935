//! Session-Management fuer das OYA-Portal
//!
//! Eine Session bindet ein opakes Token an Mitglieds-ID und Rolle. Der
//! [`SessionStore`] ist austauschbar: im Speicher (RwLock-HashMap mit
//! Cleanup-Task) oder persistent ueber das [`SessionRepository`], das nur den
//! SHA-256 des Tokens ablegt. Abgelaufene Sessions verhalten sich wie
//! nicht vorhandene.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use oya_core::Rolle;
use oya_db::{models::SessionRecord, SessionRepository};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use crate::error::AuthResult;

/// Standard-Session-Lebensdauer in Stunden
pub const STANDARD_SESSION_TTL_STUNDEN: i64 = 12;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
pub const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Ein aktives Session-Token
#[derive(Debug, Clone)]
pub struct Session {
    /// Der Token-String (URL-sicheres Base64)
    pub token: String,
    pub member_id: Uuid,
    /// Rolle zum Zeitpunkt des Logins
    pub rolle: Rolle,
    pub erstellt_am: DateTime<Utc>,
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    /// Erzeugt eine neue Session mit frischem Token
    pub fn neu(member_id: Uuid, rolle: Rolle, ttl: chrono::Duration) -> Self {
        let jetzt = Utc::now();
        Self {
            token: token_generieren(),
            member_id,
            rolle,
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + ttl,
        }
    }

    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// Speicher fuer Sessions (get/set/delete/expire)
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn speichern(&self, session: &Session) -> AuthResult<()>;
    /// Liefert nur gueltige Sessions; abgelaufene gelten als nicht vorhanden
    async fn laden(&self, token: &str) -> AuthResult<Option<Session>>;
    async fn loeschen(&self, token: &str) -> AuthResult<()>;
    /// Entfernt alle Sessions eines Mitglieds, gibt die Anzahl zurueck
    async fn mitglied_abmelden(&self, member_id: Uuid) -> AuthResult<u64>;
    async fn abgelaufene_bereinigen(&self) -> AuthResult<u64>;
}

/// Startet einen Hintergrund-Task, der abgelaufene Sessions entfernt
pub fn cleanup_starten(store: Arc<dyn SessionStore>, intervall: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(intervall).await;
            match store.abgelaufene_bereinigen().await {
                Ok(0) => {}
                Ok(anzahl) => tracing::debug!(anzahl, "Abgelaufene Sessions bereinigt"),
                Err(e) => tracing::warn!(fehler = %e, "Session-Cleanup fehlgeschlagen"),
            }
        }
    })
}

// ---------------------------------------------------------------------------
// In-Memory
// ---------------------------------------------------------------------------

/// In-Memory Session-Store mit TTL-Unterstuetzung
#[derive(Debug, Default)]
pub struct SpeicherSessionStore {
    /// token -> Session
    sessions: RwLock<HashMap<String, Session>>,
}

impl SpeicherSessionStore {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Anzahl der gueltigen Sessions
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.laeuft_ab_am > jetzt).count()
    }
}

#[async_trait]
impl SessionStore for SpeicherSessionStore {
    async fn speichern(&self, session: &Session) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        tracing::debug!(member_id = %session.member_id, "Session gespeichert");
        Ok(())
    }

    async fn laden(&self, token: &str) -> AuthResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).filter(|s| s.ist_gueltig()).cloned())
    }

    async fn loeschen(&self, token: &str) -> AuthResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn mitglied_abmelden(&self, member_id: Uuid) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.member_id != member_id);
        Ok((vorher - sessions.len()) as u64)
    }

    async fn abgelaufene_bereinigen(&self) -> AuthResult<u64> {
        let jetzt = Utc::now();
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.laeuft_ab_am > jetzt);
        Ok((vorher - sessions.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Datenbank
// ---------------------------------------------------------------------------

/// Persistenter Session-Store; das Token selbst wird nie gespeichert
pub struct DbSessionStore<R: SessionRepository> {
    repo: Arc<R>,
}

impl<R: SessionRepository> DbSessionStore<R> {
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }
}

#[async_trait]
impl<R: SessionRepository + 'static> SessionStore for DbSessionStore<R> {
    async fn speichern(&self, session: &Session) -> AuthResult<()> {
        self.repo
            .insert(&SessionRecord {
                token_hash: token_hash(&session.token),
                member_id: session.member_id,
                role: session.rolle,
                created_at: session.erstellt_am,
                expires_at: session.laeuft_ab_am,
            })
            .await?;
        tracing::debug!(member_id = %session.member_id, "Session persistiert");
        Ok(())
    }

    async fn laden(&self, token: &str) -> AuthResult<Option<Session>> {
        let hash = token_hash(token);
        let Some(record) = self.repo.get(&hash).await? else {
            return Ok(None);
        };

        if record.expires_at <= Utc::now() {
            self.repo.delete(&hash).await?;
            return Ok(None);
        }

        Ok(Some(Session {
            token: token.to_string(),
            member_id: record.member_id,
            rolle: record.role,
            erstellt_am: record.created_at,
            laeuft_ab_am: record.expires_at,
        }))
    }

    async fn loeschen(&self, token: &str) -> AuthResult<()> {
        self.repo.delete(&token_hash(token)).await?;
        Ok(())
    }

    async fn mitglied_abmelden(&self, member_id: Uuid) -> AuthResult<u64> {
        Ok(self.repo.delete_for_member(member_id).await?)
    }

    async fn abgelaufene_bereinigen(&self) -> AuthResult<u64> {
        Ok(self.repo.delete_expired().await?)
    }
}

/// Generiert einen kryptografisch sicheren Session-Token (URL-sicheres Base64)
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 des Tokens als Hex (Schluessel im persistenten Store)
pub fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
