//! Axum HTTP-Server fuer das Portal

use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::rest::{routes::portal_router, PortalState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origins: vec![],
        }
    }
}

/// Router mit Trace-Layer und State, ohne CORS (auch fuer Tests)
pub fn app(state: PortalState) -> Router {
    portal_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Axum HTTP-Server fuer das Portal
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    fn cors_layer(&self) -> CorsLayer {
        if self.konfig.cors_origins.is_empty() {
            return CorsLayer::permissive();
        }
        let origins: Vec<HeaderValue> = self
            .konfig
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        // Cookies ueber Origins hinweg brauchen explizite Header-Listen
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }

    /// Startet den REST-Server und blockiert bis zum Shutdown
    pub async fn starten(self, state: PortalState) -> Result<()> {
        let app = app(state).layer(self.cors_layer());

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(addr = %self.konfig.bind_addr, "Portal-REST-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Portal-REST-Server beendet");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown-Signal empfangen");
}

/// GET /health – ohne Session; 503 wenn die Datenbank nicht antwortet
pub async fn health(State(state): State<PortalState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!(fehler = %e, "Health-Check: Datenbank nicht erreichbar");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_konfig() {
        let k = RestServerKonfig::default();
        assert_eq!(k.bind_addr.port(), 8000);
        assert!(k.cors_origins.is_empty());
    }
}
