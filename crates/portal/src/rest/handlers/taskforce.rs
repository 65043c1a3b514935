//! REST-Handler fuer Task Force und Motorraeder

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use oya_db::models::{MotorradDaten, TaskForceDaten};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::{optionaler_text, pflichtfeld},
    PortalState,
};

/// Status neuer Motorraeder ohne Angabe
const STANDARD_MOTORRAD_STATUS: &str = "available";

/// GET /taskforce
pub async fn list_taskforce(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let eintraege = state.taskforce().list().await?;

    // Name und Seriennummer fuer die Liste nachladen
    let mut liste = Vec::with_capacity(eintraege.len());
    for eintrag in eintraege {
        let mitglied = state.mitglieder().get_by_id(eintrag.member_id).await?;
        liste.push(json!({
            "entry": eintrag,
            "full_name": mitglied.as_ref().map(|m| m.full_name.clone()),
            "serial_number": mitglied.as_ref().map(|m| m.serial_number.clone())
        }));
    }
    Ok(Json(json!({ "taskforce_members": liste })))
}

/// GET /taskforce/:id
pub async fn get_taskforce(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let eintrag = state
        .taskforce()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Task-Force-Eintrag {id}")))?;
    Ok(Json(eintrag).into_response())
}

#[derive(Debug, Deserialize)]
pub struct TaskForceBody {
    pub member_id: Uuid,
    pub rank: String,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

impl TaskForceBody {
    async fn pruefen(self, state: &PortalState) -> PortalResult<TaskForceDaten> {
        let rank = pflichtfeld(&self.rank, "Rang")?;
        if state.mitglieder().get_by_id(self.member_id).await?.is_none() {
            return Err(PortalError::ungueltig(format!(
                "Unbekanntes Mitglied {}",
                self.member_id
            )));
        }
        Ok(TaskForceDaten {
            member_id: self.member_id,
            rank,
            station: optionaler_text(self.station),
            joined_on: self.joined_on,
        })
    }
}

/// POST /taskforce
pub async fn create_taskforce(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<TaskForceBody>,
) -> PortalResult<Response> {
    let daten = body.pruefen(&state).await?;
    let eintrag = state.taskforce().create(daten).await?;
    tracing::info!(eintrag = %eintrag.id, member_id = %eintrag.member_id, "Task-Force-Eintrag angelegt");
    Ok((StatusCode::CREATED, Json(eintrag)).into_response())
}

/// PUT /taskforce/:id
pub async fn update_taskforce(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TaskForceBody>,
) -> PortalResult<Response> {
    let daten = body.pruefen(&state).await?;
    let eintrag = state.taskforce().update(id, daten).await?;
    Ok(Json(eintrag).into_response())
}

/// DELETE /taskforce/:id
pub async fn delete_taskforce(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.taskforce().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Task-Force-Eintrag {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Motorraeder
// ---------------------------------------------------------------------------

/// GET /motorcycles
pub async fn list_motorcycles(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let motorraeder = state.motorraeder().list().await?;
    Ok(Json(json!({ "bikes": motorraeder })))
}

/// GET /motorcycles/:id
pub async fn get_motorcycle(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let motorrad = state
        .motorraeder()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Motorrad {id}")))?;
    Ok(Json(motorrad).into_response())
}

#[derive(Debug, Deserialize)]
pub struct MotorradBody {
    pub registration_number: String,
    pub model: String,
    /// Task-Force-Eintrag, dem das Motorrad zugeteilt ist
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub status: Option<String>,
}

impl MotorradBody {
    async fn pruefen(self, state: &PortalState) -> PortalResult<MotorradDaten> {
        let registration_number = pflichtfeld(&self.registration_number, "Kennzeichen")?;
        let model = pflichtfeld(&self.model, "Modell")?;
        if let Some(tf) = self.assigned_to {
            if state.taskforce().get(tf).await?.is_none() {
                return Err(PortalError::ungueltig(format!(
                    "Unbekannter Task-Force-Eintrag {tf}"
                )));
            }
        }
        Ok(MotorradDaten {
            registration_number,
            model,
            assigned_to: self.assigned_to,
            status: optionaler_text(self.status)
                .unwrap_or_else(|| STANDARD_MOTORRAD_STATUS.to_string()),
        })
    }
}

/// POST /motorcycles
pub async fn create_motorcycle(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<MotorradBody>,
) -> PortalResult<Response> {
    let daten = body.pruefen(&state).await?;
    let motorrad = state.motorraeder().create(daten).await?;
    tracing::info!(
        motorrad = %motorrad.id,
        kennzeichen = %motorrad.registration_number,
        "Motorrad erfasst"
    );
    Ok((StatusCode::CREATED, Json(motorrad)).into_response())
}

/// PUT /motorcycles/:id
pub async fn update_motorcycle(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MotorradBody>,
) -> PortalResult<Response> {
    let daten = body.pruefen(&state).await?;
    let motorrad = state.motorraeder().update(id, daten).await?;
    Ok(Json(motorrad).into_response())
}

/// DELETE /motorcycles/:id
pub async fn delete_motorcycle(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.motorraeder().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Motorrad {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
