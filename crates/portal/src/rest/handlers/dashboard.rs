//! REST-Handler fuer die Dashboards

use axum::{extract::State, response::Json};
use serde_json::json;

use crate::error::PortalResult;
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::finance::uebersicht_berechnen,
    PortalState,
};

/// GET /dashboard
pub async fn dashboard(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let finanzen = uebersicht_berechnen(&state).await?;

    Ok(Json(json!({
        "member": sitzung.mitglied,
        "total_members": state.mitglieder().count().await?,
        "announcements_count": state.ankuendigungen().count_active().await?,
        "minutes_count": state.protokolle().count().await?,
        "total_motorcycles": state.motorraeder().count().await?,
        "finance": finanzen
    })))
}

/// GET /admin-dashboard
pub async fn admin_dashboard(
    AdminSitzung(sitzung): AdminSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let finanzen = uebersicht_berechnen(&state).await?;

    Ok(Json(json!({
        "member": sitzung.mitglied,
        "total_members": state.mitglieder().count().await?,
        "total_executives": state.exekutive().count().await?,
        "total_taskforce": state.taskforce().count().await?,
        "total_projects": state.projekte().count().await?,
        "announcements_count": state.ankuendigungen().count_active().await?,
        "minutes_count": state.protokolle().count().await?,
        "total_motorcycles": state.motorraeder().count().await?,
        "finance": finanzen
    })))
}
