//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass das Portal ohne Konfigurationsdatei
//! lauffaehig ist.

use std::net::SocketAddr;

use oya_auth::{password::STANDARD_ITERATIONEN, session::STANDARD_SESSION_TTL_STUNDEN};
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen (Bind-Adresse, CORS)
    pub server: ServerEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// PIN-Hashing, Sessions und Cookie
    pub sicherheit: SicherheitsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename in den Logs
    pub name: String,
    pub bind_adresse: String,
    pub port: u16,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "OYA Portal".into(),
            bind_adresse: "127.0.0.1".into(),
            port: 8000,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://oya.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

/// Wo Sessions gehalten werden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Nur im Prozess, gehen beim Neustart verloren
    Speicher,
    /// In der `sessions`-Tabelle
    Datenbank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SicherheitsEinstellungen {
    pub pbkdf2_iterationen: u32,
    pub session_ttl_stunden: i64,
    pub session_backend: SessionBackend,
    pub cookie_name: String,
    /// Secure-Flag fuer das Session-Cookie (nur hinter HTTPS setzen)
    pub cookie_secure: bool,
}

impl Default for SicherheitsEinstellungen {
    fn default() -> Self {
        Self {
            pbkdf2_iterationen: STANDARD_ITERATIONEN,
            session_ttl_stunden: STANDARD_SESSION_TTL_STUNDEN,
            session_backend: SessionBackend::Datenbank,
            cookie_name: oya_portal::STANDARD_COOKIE_NAME.into(),
            cookie_secure: false,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Bind-Adresse fuer den Portal-REST-Server
    pub fn bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let text = format!("{}:{}", self.server.bind_adresse, self.server.port);
        text.parse()
            .map_err(|e| anyhow::anyhow!("Ungueltige Bind-Adresse '{text}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.datenbank.url, "sqlite://oya.db");
        assert_eq!(cfg.sicherheit.pbkdf2_iterationen, 600_000);
        assert_eq!(cfg.sicherheit.session_backend, SessionBackend::Datenbank);
        assert_eq!(cfg.sicherheit.cookie_name, "oya_session");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_adresse().unwrap().to_string(), "127.0.0.1:8000");

        let mut kaputt = ServerConfig::default();
        kaputt.server.bind_adresse = "kein-host".into();
        assert!(kaputt.bind_adresse().is_err());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            port = 9000
            cors_origins = ["https://portal.example.org"]

            [sicherheit]
            session_backend = "speicher"
            cookie_secure = true
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.cors_origins.len(), 1);
        assert_eq!(cfg.sicherheit.session_backend, SessionBackend::Speicher);
        assert!(cfg.sicherheit.cookie_secure);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.server.bind_adresse, "127.0.0.1");
        assert_eq!(cfg.sicherheit.session_ttl_stunden, 12);
        assert!(cfg.datenbank.wal);
    }

    #[test]
    fn fehlende_datei_liefert_standard() {
        let cfg = ServerConfig::laden("/gibt/es/nicht/oya.toml").unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn unbekanntes_backend_ist_fehler() {
        let toml = r#"
            [sicherheit]
            session_backend = "redis"
        "#;
        assert!(toml::from_str::<ServerConfig>(toml).is_err());
    }
}
