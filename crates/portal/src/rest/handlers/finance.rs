//! REST-Handler fuer Beitraege, Einnahmen, Ausgaben und die Finanzuebersicht
//!
//! Alle Betraege sind Cent-Werte (`i64`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use oya_db::models::{
    AusgabeUpdate, BeitragUpdate, FinanzUebersicht, MitgliedRecord, NeueAusgabe, NeueEinnahme,
    NeuerBeitrag, JAHRESBEITRAG_CENT,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::rest::{
    extractors::{AdminSitzung, AktiveSitzung},
    handlers::{betrag_pruefen, members::SuchParameter, optionaler_text, pflichtfeld},
    PortalState,
};

/// Summen ueber alle Beitraege, Einnahmen und Ausgaben
pub(crate) async fn uebersicht_berechnen(state: &PortalState) -> PortalResult<FinanzUebersicht> {
    let beitraege = state.beitraege().total(None).await?;
    let einnahmen = state.einnahmen().total(None).await?;
    let ausgaben = state.ausgaben().total(None).await?;
    Ok(FinanzUebersicht::berechnen(beitraege, einnahmen, ausgaben))
}

/// Offener Jahresbeitrag; Ueberzahlung ergibt 0
pub fn offener_beitrag(bezahlt: i64) -> i64 {
    (JAHRESBEITRAG_CENT - bezahlt).max(0)
}

async fn mitglied_pflicht(state: &PortalState, id: Uuid) -> PortalResult<MitgliedRecord> {
    state
        .mitglieder()
        .get_by_id(id)
        .await?
        .ok_or_else(|| PortalError::ungueltig(format!("Unbekanntes Mitglied {id}")))
}

async fn mitglied_optional(
    state: &PortalState,
    id: Option<Uuid>,
) -> PortalResult<Option<MitgliedRecord>> {
    match id {
        Some(id) => Ok(state.mitglieder().get_by_id(id).await?),
        None => Ok(None),
    }
}

/// GET /finance/overview
pub async fn finance_overview(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<FinanzUebersicht>> {
    Ok(Json(uebersicht_berechnen(&state).await?))
}

// ---------------------------------------------------------------------------
// Beitraege
// ---------------------------------------------------------------------------

/// GET /contributions
pub async fn list_contributions(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let beitraege = state.beitraege().list(None).await?;
    let gesamt = state.beitraege().total(None).await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "contributions": beitraege,
        "total_contributions": gesamt
    })))
}

#[derive(Debug, Deserialize)]
pub struct BeitragBody {
    pub member_id: Uuid,
    pub year: i32,
    pub amount_paid: i64,
    pub payment_date: NaiveDate,
}

/// POST /contributions
///
/// Pro Mitglied und Jahr ist nur ein Beitrag erlaubt (409).
pub async fn create_contribution(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<BeitragBody>,
) -> PortalResult<Response> {
    betrag_pruefen(body.amount_paid)?;
    mitglied_pflicht(&state, body.member_id).await?;

    let beitrag = state
        .beitraege()
        .create(NeuerBeitrag {
            member_id: body.member_id,
            year: body.year,
            amount_paid: body.amount_paid,
            payment_date: body.payment_date,
            recorded_by: Some(admin.member_id()),
        })
        .await?;

    tracing::info!(
        admin = %admin.member_id(),
        member_id = %beitrag.member_id,
        jahr = beitrag.year,
        betrag = beitrag.amount_paid,
        "Beitrag erfasst"
    );
    Ok((StatusCode::CREATED, Json(beitrag)).into_response())
}

/// GET /contributions/:id (Quittung)
pub async fn contribution_receipt(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Json<serde_json::Value>> {
    let beitrag = state
        .beitraege()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Beitrag {id}")))?;
    let zahler = mitglied_optional(&state, Some(beitrag.member_id)).await?;
    let erfasst_von = mitglied_optional(&state, beitrag.recorded_by).await?;

    Ok(Json(json!({
        "contribution": beitrag,
        "payer": zahler,
        "recorded_by": erfasst_von
    })))
}

/// PUT /contributions/:id
pub async fn update_contribution(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BeitragBody>,
) -> PortalResult<Response> {
    betrag_pruefen(body.amount_paid)?;
    mitglied_pflicht(&state, body.member_id).await?;

    let beitrag = state
        .beitraege()
        .update(
            id,
            BeitragUpdate {
                member_id: Some(body.member_id),
                year: Some(body.year),
                amount_paid: Some(body.amount_paid),
                payment_date: Some(body.payment_date),
            },
        )
        .await?;
    Ok(Json(beitrag).into_response())
}

/// DELETE /contributions/:id
pub async fn delete_contribution(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.beitraege().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Beitrag {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /my-contributions
pub async fn my_contributions(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let id = sitzung.member_id();
    let beitraege = state.beitraege().list(Some(id)).await?;
    let einnahmen = state.einnahmen().list(Some(id)).await?;

    let beitraege_gesamt: i64 = beitraege.iter().map(|b| b.amount_paid).sum();
    let einnahmen_gesamt: i64 = einnahmen.iter().map(|e| e.amount).sum();

    let jahr = Utc::now().year();
    let dieses_jahr: i64 = beitraege
        .iter()
        .filter(|b| b.year == jahr)
        .map(|b| b.amount_paid)
        .sum();

    Ok(Json(json!({
        "member": sitzung.mitglied,
        "contributions": beitraege,
        "incomes": einnahmen,
        "total_dues": beitraege_gesamt,
        "total_income": einnahmen_gesamt,
        "total_money": beitraege_gesamt + einnahmen_gesamt,
        "year": jahr,
        "yearly_dues": JAHRESBEITRAG_CENT,
        "paid_this_year": dieses_jahr,
        "outstanding": offener_beitrag(dieses_jahr)
    })))
}

// ---------------------------------------------------------------------------
// Einnahmen / Spenden
// ---------------------------------------------------------------------------

/// GET /incomes
pub async fn list_incomes(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let einnahmen = state.einnahmen().list(None).await?;
    let beitraege = state.beitraege().list(None).await?;
    let uebersicht = uebersicht_berechnen(&state).await?;

    Ok(Json(json!({
        "member": sitzung.mitglied,
        "incomes": einnahmen,
        "contributions": beitraege,
        "total_income": uebersicht.einnahmen_gesamt,
        "total_contributions": uebersicht.beitraege_gesamt,
        "total_money": uebersicht.geld_gesamt
    })))
}

#[derive(Debug, Deserialize)]
pub struct EinnahmeBody {
    #[serde(default)]
    pub member_id: Option<Uuid>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /incomes
///
/// Braucht nur eine Session. Ist ein Mitglied angegeben, werden Name und
/// Seriennummer des Absenders aus dessen Datensatz uebernommen.
pub async fn create_income(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
    Json(body): Json<EinnahmeBody>,
) -> PortalResult<Response> {
    betrag_pruefen(body.amount)?;

    let (sender_name, sender_id) = match body.member_id {
        Some(member_id) => {
            let m = mitglied_pflicht(&state, member_id).await?;
            (m.full_name, m.serial_number)
        }
        None => (
            pflichtfeld(body.sender_name.as_deref().unwrap_or_default(), "Absender")?,
            body.sender_id.unwrap_or_default().trim().to_string(),
        ),
    };

    let einnahme = state
        .einnahmen()
        .create(NeueEinnahme {
            member_id: body.member_id,
            sender_name,
            sender_id,
            amount: body.amount,
            date: body.date,
            description: optionaler_text(body.description),
            recorded_by: Some(sitzung.member_id()),
        })
        .await?;

    tracing::info!(
        erfasst_von = %sitzung.member_id(),
        einnahme = %einnahme.id,
        betrag = einnahme.amount,
        "Einnahme erfasst"
    );
    Ok((StatusCode::CREATED, Json(einnahme)).into_response())
}

/// GET /incomes/:id (Quittung)
pub async fn income_receipt(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Json<serde_json::Value>> {
    let einnahme = state
        .einnahmen()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Einnahme {id}")))?;
    let absender = mitglied_optional(&state, einnahme.member_id).await?;
    let erfasst_von = mitglied_optional(&state, einnahme.recorded_by).await?;

    Ok(Json(json!({
        "income": einnahme,
        "sender": absender,
        "recorded_by": erfasst_von
    })))
}

/// GET /member-lookup?q=
///
/// Erster Treffer in Name oder Seriennummer, als Vorbelegung fuer Einnahmen.
pub async fn member_lookup(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Query(params): Query<SuchParameter>,
) -> PortalResult<Json<serde_json::Value>> {
    let query = params.q.unwrap_or_default().trim().to_string();
    let treffer = if query.is_empty() {
        None
    } else {
        let nadel = query.to_lowercase();
        state
            .mitglieder()
            .list(Some(&query))
            .await?
            .into_iter()
            .find(|m| {
                m.full_name.to_lowercase().contains(&nadel)
                    || m.serial_number.to_lowercase().contains(&nadel)
            })
    };

    Ok(Json(json!({
        "query": query,
        "sender_name": treffer.as_ref().map(|m| m.full_name.clone()),
        "sender_id": treffer.as_ref().map(|m| m.serial_number.clone()),
        "found_member": treffer
    })))
}

// ---------------------------------------------------------------------------
// Ausgaben
// ---------------------------------------------------------------------------

/// GET /expenses
pub async fn list_expenses(
    AktiveSitzung(sitzung): AktiveSitzung,
    State(state): State<PortalState>,
) -> PortalResult<Json<serde_json::Value>> {
    let ausgaben = state.ausgaben().list(None).await?;
    let uebersicht = uebersicht_berechnen(&state).await?;
    Ok(Json(json!({
        "member": sitzung.mitglied,
        "expenses": ausgaben,
        "total_expenses": uebersicht.ausgaben_gesamt,
        "total_income": uebersicht.einnahmen_gesamt,
        "total_contributions": uebersicht.beitraege_gesamt,
        "net_balance": uebersicht.saldo
    })))
}

/// GET /expenses/:id
pub async fn get_expense(
    AktiveSitzung(_): AktiveSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<Response> {
    let ausgabe = state
        .ausgaben()
        .get(id)
        .await?
        .ok_or_else(|| PortalError::nicht_gefunden(format!("Ausgabe {id}")))?;
    Ok(Json(ausgabe).into_response())
}

#[derive(Debug, Deserialize)]
pub struct AusgabeBody {
    pub title: String,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

async fn projekt_pruefen(state: &PortalState, project_id: Option<Uuid>) -> PortalResult<()> {
    if let Some(pid) = project_id {
        if state.projekte().get(pid).await?.is_none() {
            return Err(PortalError::ungueltig(format!("Unbekanntes Projekt {pid}")));
        }
    }
    Ok(())
}

/// POST /expenses
pub async fn create_expense(
    AdminSitzung(admin): AdminSitzung,
    State(state): State<PortalState>,
    Json(body): Json<AusgabeBody>,
) -> PortalResult<Response> {
    let title = pflichtfeld(&body.title, "Titel")?;
    betrag_pruefen(body.amount)?;
    projekt_pruefen(&state, body.project_id).await?;

    let ausgabe = state
        .ausgaben()
        .create(NeueAusgabe {
            title,
            amount: body.amount,
            date: body.date,
            project_id: body.project_id,
            recorded_by: Some(admin.member_id()),
        })
        .await?;

    tracing::info!(admin = %admin.member_id(), ausgabe = %ausgabe.id, betrag = ausgabe.amount, "Ausgabe erfasst");
    Ok((StatusCode::CREATED, Json(ausgabe)).into_response())
}

/// PUT /expenses/:id
pub async fn update_expense(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AusgabeBody>,
) -> PortalResult<Response> {
    let title = pflichtfeld(&body.title, "Titel")?;
    betrag_pruefen(body.amount)?;
    projekt_pruefen(&state, body.project_id).await?;

    let ausgabe = state
        .ausgaben()
        .update(
            id,
            AusgabeUpdate {
                title: Some(title),
                amount: Some(body.amount),
                date: Some(body.date),
                project_id: Some(body.project_id),
            },
        )
        .await?;
    Ok(Json(ausgabe).into_response())
}

/// DELETE /expenses/:id
pub async fn delete_expense(
    AdminSitzung(_): AdminSitzung,
    State(state): State<PortalState>,
    Path(id): Path<Uuid>,
) -> PortalResult<StatusCode> {
    if !state.ausgaben().delete(id).await? {
        return Err(PortalError::nicht_gefunden(format!("Ausgabe {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offener_beitrag_nie_negativ() {
        assert_eq!(offener_beitrag(0), JAHRESBEITRAG_CENT);
        assert_eq!(offener_beitrag(200_000), 300_000);
        assert_eq!(offener_beitrag(JAHRESBEITRAG_CENT), 0);
        assert_eq!(offener_beitrag(JAHRESBEITRAG_CENT + 1), 0);
    }
}
