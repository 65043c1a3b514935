//! REST-Handler fuer Login, Logout und das eigene Profil

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::{PortalResult, LOGIN_PFAD};
use crate::rest::{
    extractors::AktiveSitzung,
    middleware::{cookie_loeschen, session_cookie, token_aus_headers},
    PortalState,
};

/// Ziel nach erfolgreichem Login
pub const DASHBOARD_PFAD: &str = "/dashboard";

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub serial_number: String,
    pub pin: String,
}

/// GET /login
///
/// Angemeldete Mitglieder werden direkt zum Dashboard weitergeleitet.
pub async fn login_seite(State(state): State<PortalState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_aus_headers(&headers, &state.cookie.name) {
        if state.auth.session_validieren(token).await.is_ok() {
            return Redirect::to(DASHBOARD_PFAD).into_response();
        }
    }
    (
        StatusCode::OK,
        Json(json!({
            "action": LOGIN_PFAD,
            "fields": ["serial_number", "pin"]
        })),
    )
        .into_response()
}

/// POST /login
pub async fn login(
    State(state): State<PortalState>,
    Json(body): Json<LoginBody>,
) -> PortalResult<Response> {
    let anmeldung = state.auth.anmelden(&body.serial_number, &body.pin).await?;

    let restlaufzeit = (anmeldung.session.laeuft_ab_am - Utc::now()).num_seconds();
    let cookie = session_cookie(&state.cookie, &anmeldung.session.token, restlaufzeit);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "member": anmeldung.mitglied,
            "token": anmeldung.session.token,
            "expires_at": anmeldung.session.laeuft_ab_am,
            "redirect": DASHBOARD_PFAD
        })),
    )
        .into_response())
}

/// POST /logout
///
/// Gelingt immer; ein vorhandenes Token wird zerstoert.
pub async fn logout(State(state): State<PortalState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_aus_headers(&headers, &state.cookie.name) {
        if let Err(e) = state.auth.abmelden(token).await {
            tracing::warn!(fehler = %e, "Session konnte beim Logout nicht entfernt werden");
        }
    }
    (
        [(header::SET_COOKIE, cookie_loeschen(&state.cookie))],
        Redirect::to(LOGIN_PFAD),
    )
        .into_response()
}

/// GET /me
pub async fn me(AktiveSitzung(sitzung): AktiveSitzung) -> impl IntoResponse {
    Json(sitzung.mitglied)
}
