//! REST-Handler fuer Exekutiv-Positionen und Amtszeiten

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use oya_core::ExekutivPosition;
use oya_db::models::AmtszeitUpdate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    PortalState,
};

/// GET /executives
pub async fn list_executives(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let exekutive = state.exekutive().list().await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "executives": exekutive
    })))
}

#[derive(Debug, Deserialize)]
pub struct ZuweisungBody {
    pub member_id: Uuid,
    pub position: ExekutivPosition,
}

/// POST /executives
///
/// Der bisherige Inhaber der Position wird verdraengt.
pub async fn assign_executive(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<ZuweisungBody>,
) -> PortalResult<Response> {
    let besetzung = state
        .verwaltung
        .exekutive_zuweisen(body.member_id, body.position)
        .await?;

    tracing::info!(
        admin = %admin.member_id(),
        member_id = %body.member_id,
        position = %body.position,
        "Exekutiv-Position besetzt"
    );
    Ok((StatusCode::CREATED, Json(besetzung)).into_response())
}

/// DELETE /executives/:id
pub async fn remove_executive(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.verwaltung.exekutive_entfernen(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Besetzung {id}")));
    }
    tracing::info!(admin = %admin.member_id(), besetzung = %id, "Exekutiv-Besetzung entfernt");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Amtszeiten
// ---------------------------------------------------------------------------

/// GET /tenures
pub async fn list_tenures(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let amtszeiten = state.amtszeiten().list().await?;
    let aktiv = amtszeiten.iter().find(|a| a.is_active).map(|a| a.id);
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "tenures": amtszeiten,
        "active_tenure": aktiv
    })))
}

/// GET /tenures/:id
pub async fn get_tenure(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let amtszeit = state
        .amtszeiten()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Amtszeit {id}")))?;
    Ok(Json(amtszeit).into_response())
}

#[derive(Debug, Deserialize)]
pub struct AmtszeitBody {
    pub name: String,
    pub start_year: i32,
    #[serde(default)]
    pub end_year: Option<i32>,
}

/// POST /tenures
///
/// Die neue Amtszeit wird aktiv, alle anderen werden deaktiviert.
pub async fn add_tenure(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<AmtszeitBody>,
) -> PortalResult<Response> {
    let amtszeit = state
        .verwaltung
        .amtszeit_hinzufuegen(&body.name, body.start_year, body.end_year)
        .await?;

    tracing::info!(
        admin = %admin.member_id(),
        amtszeit = %amtszeit.id,
        name = %amtszeit.name,
        "Amtszeit aktiviert"
    );
    Ok((StatusCode::CREATED, Json(amtszeit)).into_response())
}

/// PUT /tenures/:id
pub async fn update_tenure(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AmtszeitBody>,
) -> PortalResult<Response> {
    let amtszeit = state
        .verwaltung
        .amtszeit_bearbeiten(
            id,
            AmtszeitUpdate {
                name: Some(body.name.trim().to_string()),
                start_year: Some(body.start_year),
                end_year: Some(body.end_year),
            },
        )
        .await?;
    Ok(Json(amtszeit).into_response())
}

/// DELETE /tenures/:id
pub async fn delete_tenure(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.amtszeiten().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Amtszeit {id}")));
    }
    tracing::info!(admin = %admin.member_id(), amtszeit = %id, "Amtszeit geloescht");
    Ok(StatusCode::NO_CONTENT)
}
