//! Gemeinsame Hilfen fuer die HTTP-Tests (In-Memory SQLite, oneshot)

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use oya_auth::{AuthKonfig, AuthService, DbSessionStore, MitgliedAnlegen, VerwaltungService};
use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::{models::MitgliedRecord, SqliteDb};
use oya_portal::{app, CookieKonfig, PortalState};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_SERIAL: &str = "ADM-001";
pub const ADMIN_PIN: &str = "999999";

pub struct TestPortal {
    pub app: Router,
    pub state: PortalState,
}

pub struct Antwort {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestPortal {
    pub async fn neu() -> Self {
        let db = Arc::new(
            SqliteDb::in_memory()
                .await
                .expect("In-Memory DB konnte nicht erstellt werden"),
        );
        let sessions = DbSessionStore::neu(Arc::clone(&db));
        let auth = Arc::new(AuthService::neu(
            db.clone(),
            sessions,
            AuthKonfig {
                pbkdf2_iterationen: 1_000,
                session_ttl_stunden: 1,
            },
        ));
        let verwaltung = Arc::new(VerwaltungService::neu(db.clone(), db.clone()));

        let state = PortalState::neu(db, auth, verwaltung, CookieKonfig::default());
        let portal = Self {
            app: app(state.clone()),
            state,
        };
        portal.mitglied(ADMIN_SERIAL, "Admin", ADMIN_PIN, Rolle::Admin).await;
        portal
    }

    pub async fn mitglied(&self, serial: &str, name: &str, pin: &str, rolle: Rolle) -> MitgliedRecord {
        self.state
            .auth
            .mitglied_anlegen(MitgliedAnlegen {
                serial_number: serial,
                full_name: name,
                phone_number: "0700000000",
                pin,
                role: rolle,
                status: Mitgliedsstatus::Active,
            })
            .await
            .expect("Mitglied anlegen fehlgeschlagen")
    }

    pub async fn anfrage(
        &self,
        methode: Method,
        pfad: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Antwort {
        let mut builder = Request::builder().method(methode).uri(pfad);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Request bauen");

        self.senden(request).await
    }

    pub async fn senden(&self, request: Request<Body>) -> Antwort {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router antwortet immer");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body lesen");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Antwort {
            status,
            headers,
            json,
        }
    }

    pub async fn get(&self, pfad: &str, token: Option<&str>) -> Antwort {
        self.anfrage(Method::GET, pfad, token, None).await
    }

    pub async fn post(&self, pfad: &str, token: Option<&str>, body: Value) -> Antwort {
        self.anfrage(Method::POST, pfad, token, Some(body)).await
    }

    /// Meldet an und gibt das Token zurueck
    pub async fn login(&self, serial: &str, pin: &str) -> String {
        let antwort = self
            .post(
                "/login",
                None,
                serde_json::json!({ "serial_number": serial, "pin": pin }),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::OK, "Login fehlgeschlagen: {}", antwort.json);
        antwort.json["token"]
            .as_str()
            .expect("Token in der Antwort")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_SERIAL, ADMIN_PIN).await
    }
}
