//! REST-Handler fuer Ankuendigungen und Sitzungsprotokolle

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use oya_db::models::{AnkuendigungDaten, ProtokollDaten};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::pflichtfeld,
    PortalState,
};

fn standard_aktiv() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AnkuendigungBody {
    pub title: String,
    pub message: String,
    #[serde(default = "standard_aktiv")]
    pub is_active: bool,
}

impl AnkuendigungBody {
    fn pruefen(self) -> PortalResult<AnkuendigungDaten> {
        Ok(AnkuendigungDaten {
            title: pflichtfeld(&self.title, "Titel")?,
            message: pflichtfeld(&self.message, "Nachricht")?,
            is_active: self.is_active,
        })
    }
}

/// GET /announcements (nur aktive, neueste zuerst)
pub async fn list_announcements(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let ankuendigungen = state.ankuendigungen().list_active().await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "announcements": ankuendigungen
    })))
}

/// GET /announcements/:id
pub async fn get_announcement(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let ankuendigung = state
        .ankuendigungen()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Ankuendigung {id}")))?;
    Ok(Json(ankuendigung).into_response())
}

/// POST /announcements
pub async fn create_announcement(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<AnkuendigungBody>,
) -> PortalResult<Response> {
    let ankuendigung = state
        .ankuendigungen()
        .create(body.pruefen()?, Some(admin.member_id()))
        .await?;
    tracing::info!(admin = %admin.member_id(), ankuendigung = %ankuendigung.id, "Ankuendigung veroeffentlicht");
    Ok((StatusCode::CREATED, Json(ankuendigung)).into_response())
}

/// PUT /announcements/:id
pub async fn update_announcement(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnkuendigungBody>,
) -> PortalResult<Response> {
    let ankuendigung = state.ankuendigungen().update(id, body.pruefen()?).await?;
    Ok(Json(ankuendigung).into_response())
}

/// DELETE /announcements/:id
pub async fn delete_announcement(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.ankuendigungen().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Ankuendigung {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Sitzungsprotokolle
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProtokollBody {
    pub title: String,
    pub meeting_date: NaiveDate,
    pub content: String,
}

impl ProtokollBody {
    fn pruefen(self) -> PortalResult<ProtokollDaten> {
        Ok(ProtokollDaten {
            title: pflichtfeld(&self.title, "Titel")?,
            meeting_date: self.meeting_date,
            content: pflichtfeld(&self.content, "Inhalt")?,
        })
    }
}

/// GET /minutes (neuestes Sitzungsdatum zuerst)
pub async fn list_minutes(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let protokolle = state.protokolle().list().await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "minutes": protokolle
    })))
}

/// GET /minutes/:id
pub async fn get_minutes(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let protokoll = state
        .protokolle()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Protokoll {id}")))?;
    Ok(Json(protokoll).into_response())
}

/// POST /minutes
pub async fn create_minutes(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<ProtokollBody>,
) -> PortalResult<Response> {
    let protokoll = state
        .protokolle()
        .create(body.pruefen()?, Some(admin.member_id()))
        .await?;
    tracing::info!(admin = %admin.member_id(), protokoll = %protokoll.id, "Protokoll erfasst");
    Ok((StatusCode::CREATED, Json(protokoll)).into_response())
}

/// PUT /minutes/:id
pub async fn update_minutes(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProtokollBody>,
) -> PortalResult<Response> {
    let protokoll = state.protokolle().update(id, body.pruefen()?).await?;
    Ok(Json(protokoll).into_response())
}

/// DELETE /minutes/:id
pub async fn delete_minutes(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.protokolle().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Protokoll {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
