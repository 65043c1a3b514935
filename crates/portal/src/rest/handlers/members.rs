//! REST-Handler fuer Mitglieder

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use oya_auth::MitgliedAnlegen;
use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::models::MitgliedUpdate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::optionaler_text,
    PortalState,
};

#[derive(Debug, Default, Deserialize)]
pub struct SuchParameter {
    pub q: Option<String>,
}

/// GET /members?q=
pub async fn list_members(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
    Query(params): Query<SuchParameter>,
) -> PortalResult<Json<serde_json::Value>> {
    let query = params.q.unwrap_or_default();
    let mitglieder = state.mitglieder().list(Some(&query)).await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "members": mitglieder,
        "query": query.trim()
    })))
}

/// GET /members/:id
pub async fn get_member(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let mitglied = state
        .mitglieder()
        .get_by_id(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Mitglied {id}")))?;
    Ok(Json(mitglied).into_response())
}

#[derive(Debug, Deserialize)]
pub struct MitgliedBody {
    pub serial_number: String,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    pub pin: String,
    #[serde(default)]
    pub role: Option<Rolle>,
    #[serde(default)]
    pub status: Option<Mitgliedsstatus>,
}

/// POST /members
pub async fn create_member(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<MitgliedBody>,
) -> PortalResult<Response> {
    let mitglied = state
        .auth
        .mitglied_anlegen(MitgliedAnlegen {
            serial_number: &body.serial_number,
            full_name: &body.full_name,
            phone_number: &body.phone_number,
            pin: &body.pin,
            role: body.role.unwrap_or(Rolle::Mitglied),
            status: body.status.unwrap_or(Mitgliedsstatus::Active),
        })
        .await?;

    tracing::info!(admin = %admin.member_id(), member_id = %mitglied.id, "Mitglied ueber API angelegt");
    Ok((StatusCode::CREATED, Json(mitglied)).into_response())
}

/// Alle Felder optional; eine nicht-leere `pin` setzt die PIN zurueck
#[derive(Debug, Default, Deserialize)]
pub struct MitgliedBearbeitenBody {
    pub serial_number: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Rolle>,
    pub status: Option<Mitgliedsstatus>,
    pub pin: Option<String>,
}

/// PUT /members/:id
pub async fn update_member(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MitgliedBearbeitenBody>,
) -> PortalResult<Response> {
    if let Some(rolle) = body.role.filter(|r| !r.erfuellt(Rolle::Exekutive)) {
        let bisher = state
            .mitglieder()
            .get_by_id(id)
            .await?
            .ok_or_else(|| PortalError::nicht_gefunden(format!("Mitglied {id}")))?;
        // Sitz und Rolle bleiben deckungsgleich; der Sitz wird nur ueber die Exekutive geraeumt
        if let Some(position) = bisher.executive_position {
            return Err(PortalError::ungueltig(format!(
                "Mitglied haelt die Position {}; vor dem Wechsel auf die Rolle {} \
                 zuerst DELETE /executives/{{id}} ausfuehren",
                position.als_str(),
                rolle.als_str()
            )));
        }
    }

    let update = MitgliedUpdate {
        serial_number: nicht_leer(body.serial_number, "Seriennummer")?,
        full_name: nicht_leer(body.full_name, "Name")?,
        phone_number: body.phone_number.map(|p| p.trim().to_string()),
        role: body.role,
        status: body.status,
        ..Default::default()
    };

    let mut mitglied = state.mitglieder().update(id, update).await?;

    if let Some(pin) = optionaler_text(body.pin) {
        state.auth.pin_zuruecksetzen(id, &pin).await?;
        mitglied = state
            .mitglieder()
            .get_by_id(id)
            .await?
            .ok_or_else(|| PortalError::nicht_gefunden(format!("Mitglied {id}")))?;
    }

    tracing::info!(admin = %admin.member_id(), member_id = %id, "Mitglied bearbeitet");
    Ok(Json(mitglied).into_response())
}

/// DELETE /members/:id
pub async fn delete_member(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.auth.mitglied_loeschen(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Mitglied {id}")));
    }
    tracing::info!(admin = %admin.member_id(), member_id = %id, "Mitglied ueber API geloescht");
    Ok(StatusCode::NO_CONTENT)
}

fn nicht_leer(wert: Option<String>, feld: &str) -> PortalResult<Option<String>> {
    match wert {
        Some(w) if w.trim().is_empty() => Err(PortalError::ungueltig(format!("{feld} fehlt"))),
        Some(w) => Ok(Some(w.trim().to_string())),
        None => Ok(None),
    }
}
