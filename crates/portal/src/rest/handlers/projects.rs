//! REST-Handler fuer Projekte
//!
//! Beim Speichern wird `completed_by_tenure` aus dem Status abgeleitet:
//! ein abgeschlossenes Projekt gehoert der gerade aktiven Amtszeit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use oya_db::models::{ProjektDaten, ProjektStatus};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::pflichtfeld,
    PortalState,
};

/// Abschluss-Amtszeit beim Anlegen: nur `completed` wird markiert
pub fn abschluss_beim_anlegen(status: ProjektStatus, aktiv: Option<Uuid>) -> Option<Uuid> {
    match status {
        ProjektStatus::Completed => aktiv,
        _ => None,
    }
}

/// Abschluss-Amtszeit beim Bearbeiten; andere Status behalten den
/// uebermittelten Wert
pub fn abschluss_beim_bearbeiten(
    status: ProjektStatus,
    aktiv: Option<Uuid>,
    uebermittelt: Option<Uuid>,
) -> Option<Uuid> {
    match status {
        ProjektStatus::Completed => aktiv,
        ProjektStatus::HandedOver => None,
        _ => uebermittelt,
    }
}

/// GET /projects
pub async fn list_projects(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let projekte = state.projekte().list().await?;
    Ok(Json(json!({ "projects": projekte })))
}

/// GET /projects/:id
pub async fn project_detail(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Json<serde_json::Value>> {
    let projekt = state
        .projekte()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Projekt {id}")))?;
    let ausgaben = state.ausgaben().list(Some(id)).await?;
    let gesamt = state.ausgaben().total(Some(id)).await?;

    Ok(Json(json!({
        "project": projekt,
        "expenses": ausgaben,
        "total_spent": gesamt
    })))
}

#[derive(Debug, Deserialize)]
pub struct ProjektBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjektStatus,
    #[serde(default)]
    pub started_by_tenure: Option<Uuid>,
    #[serde(default)]
    pub completed_by_tenure: Option<Uuid>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ProjektBody {
    fn in_daten(self, completed_by_tenure: Option<Uuid>) -> PortalResult<ProjektDaten> {
        Ok(ProjektDaten {
            title: pflichtfeld(&self.title, "Titel")?,
            description: self.description.trim().to_string(),
            status: self.status,
            started_by_tenure: self.started_by_tenure,
            completed_by_tenure,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

async fn amtszeit_pruefen(state: &PortalState, amtszeit: Option<Uuid>) -> PortalResult<()> {
    if let Some(tid) = amtszeit {
        if state.amtszeiten().get(tid).await?.is_none() {
            return Err(PortalError::ungueltig(format!("Unbekannte Amtszeit {tid}")));
        }
    }
    Ok(())
}

async fn aktive_amtszeit_id(state: &PortalState) -> PortalResult<Option<Uuid>> {
    Ok(state.verwaltung.aktive_amtszeit().await?.map(|a| a.id))
}

/// POST /projects
pub async fn create_project(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<ProjektBody>,
) -> PortalResult<Response> {
    amtszeit_pruefen(&state, body.started_by_tenure).await?;
    let abschluss = abschluss_beim_anlegen(body.status, aktive_amtszeit_id(&state).await?);
    let projekt = state.projekte().create(body.in_daten(abschluss)?).await?;

    tracing::info!(
        admin = %admin.member_id(),
        projekt = %projekt.id,
        status = projekt.status.als_str(),
        "Projekt angelegt"
    );
    Ok((StatusCode::CREATED, Json(projekt)).into_response())
}

/// PUT /projects/:id
pub async fn update_project(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProjektBody>,
) -> PortalResult<Response> {
    amtszeit_pruefen(&state, body.started_by_tenure).await?;
    let abschluss = abschluss_beim_bearbeiten(
        body.status,
        aktive_amtszeit_id(&state).await?,
        body.completed_by_tenure,
    );
    amtszeit_pruefen(&state, abschluss).await?;
    let projekt = state.projekte().update(id, body.in_daten(abschluss)?).await?;
    Ok(Json(projekt).into_response())
}

/// DELETE /projects/:id
pub async fn delete_project(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.projekte().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Projekt {id}")));
    }
    tracing::info!(admin = %admin.member_id(), projekt = %id, "Projekt geloescht");
    Ok(StatusCode::NO_CONTENT)
}
