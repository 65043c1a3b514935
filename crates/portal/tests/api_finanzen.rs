//! HTTP-Tests fuer Beitraege, Einnahmen, Uebersicht und Task Force

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::TestPortal;
use oya_core::Rolle;
use oya_db::models::JAHRESBEITRAG_CENT;
use serde_json::json;

#[tokio::test]
async fn doppelter_jahresbeitrag_ist_konflikt() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;
    let m = portal.mitglied("M001", "Juma", "123456", Rolle::Mitglied).await;

    let beitrag = json!({
        "member_id": m.id,
        "year": 2024,
        "amount_paid": 500_000,
        "payment_date": "2024-02-01"
    });
    let erster = portal.post("/contributions", Some(&admin), beitrag.clone()).await;
    assert_eq!(erster.status, StatusCode::CREATED);
    assert!(erster.json["recorded_by"].is_string());

    let zweiter = portal.post("/contributions", Some(&admin), beitrag).await;
    assert_eq!(zweiter.status, StatusCode::CONFLICT);
    assert_eq!(
        zweiter.json["error"]["message"],
        "This member has already paid dues for this year."
    );
}

#[tokio::test]
async fn mitglied_darf_keinen_beitrag_erfassen() {
    let portal = TestPortal::neu().await;
    let m = portal.mitglied("M001", "Juma", "123456", Rolle::Mitglied).await;
    let token = portal.login("M001", "123456").await;

    let antwort = portal
        .post(
            "/contributions",
            Some(&token),
            json!({ "member_id": m.id, "year": 2024, "amount_paid": 100, "payment_date": "2024-02-01" }),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn eigene_beitraege_mit_offenem_betrag() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;
    let m = portal.mitglied("M001", "Juma", "123456", Rolle::Mitglied).await;
    let jahr = Utc::now().year();

    portal
        .post(
            "/contributions",
            Some(&admin),
            json!({
                "member_id": m.id,
                "year": jahr,
                "amount_paid": 200_000,
                "payment_date": format!("{jahr}-01-15")
            }),
        )
        .await;

    let token = portal.login("M001", "123456").await;
    let antwort = portal.get("/my-contributions", Some(&token)).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json["paid_this_year"], 200_000);
    assert_eq!(antwort.json["outstanding"], JAHRESBEITRAG_CENT - 200_000);
    assert_eq!(antwort.json["total_dues"], 200_000);
}

#[tokio::test]
async fn einnahme_uebernimmt_mitgliedsdaten() {
    let portal = TestPortal::neu().await;
    let m = portal.mitglied("M001", "Juma Mwangi", "123456", Rolle::Mitglied).await;
    // Einnahmen brauchen nur eine Session
    let token = portal.login("M001", "123456").await;

    let antwort = portal
        .post(
            "/incomes",
            Some(&token),
            json!({
                "member_id": m.id,
                "sender_name": "Falscher Name",
                "sender_id": "FALSCH",
                "amount": 75_000,
                "date": "2024-03-10",
                "description": "Spende"
            }),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::CREATED);
    assert_eq!(antwort.json["sender_name"], "Juma Mwangi");
    assert_eq!(antwort.json["sender_id"], "M001");

    let ohne_mitglied = portal
        .post(
            "/incomes",
            Some(&token),
            json!({ "sender_name": "  ", "amount": 1_000, "date": "2024-03-10" }),
        )
        .await;
    assert_eq!(ohne_mitglied.status, StatusCode::BAD_REQUEST);

    let id = antwort.json["id"].as_str().unwrap();
    let quittung = portal.get(&format!("/incomes/{id}"), Some(&token)).await;
    assert_eq!(quittung.status, StatusCode::OK);
    assert_eq!(quittung.json["sender"]["serial_number"], "M001");
}

#[tokio::test]
async fn mitgliedssuche_fuer_einnahmen() {
    let portal = TestPortal::neu().await;
    portal.mitglied("K042", "Kiprono Chebet", "123456", Rolle::Mitglied).await;
    let admin = portal.admin_token().await;

    let antwort = portal.get("/member-lookup?q=kiprono", Some(&admin)).await;
    assert_eq!(antwort.json["sender_id"], "K042");
    assert_eq!(antwort.json["sender_name"], "Kiprono Chebet");

    let leer = portal.get("/member-lookup?q=niemand", Some(&admin)).await;
    assert!(leer.json["found_member"].is_null());
}

#[tokio::test]
async fn finanzuebersicht_rechnet_saldo() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;
    let m = portal.mitglied("M001", "Juma", "123456", Rolle::Mitglied).await;

    portal
        .post(
            "/contributions",
            Some(&admin),
            json!({ "member_id": m.id, "year": 2024, "amount_paid": 500_000, "payment_date": "2024-01-02" }),
        )
        .await;
    portal
        .post(
            "/incomes",
            Some(&admin),
            json!({ "sender_name": "Gast", "amount": 100_000, "date": "2024-01-03" }),
        )
        .await;
    portal
        .post(
            "/expenses",
            Some(&admin),
            json!({ "title": "Miete", "amount": 150_000, "date": "2024-01-04" }),
        )
        .await;

    let antwort = portal.get("/finance/overview", Some(&admin)).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json["beitraege_gesamt"], 500_000);
    assert_eq!(antwort.json["einnahmen_gesamt"], 100_000);
    assert_eq!(antwort.json["geld_gesamt"], 600_000);
    assert_eq!(antwort.json["ausgaben_gesamt"], 150_000);
    assert_eq!(antwort.json["saldo"], 450_000);

    let dashboard = portal.get("/dashboard", Some(&admin)).await;
    assert_eq!(dashboard.json["finance"]["saldo"], 450_000);
    assert_eq!(dashboard.json["total_members"], 2);
}

#[tokio::test]
async fn negativer_betrag_abgelehnt() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;

    let antwort = portal
        .post(
            "/expenses",
            Some(&admin),
            json!({ "title": "Fehler", "amount": -5, "date": "2024-01-04" }),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn taskforce_und_motorrad() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;
    let m = portal.mitglied("T001", "Otieno", "123456", Rolle::Mitglied).await;

    let eintrag = portal
        .post(
            "/taskforce",
            Some(&admin),
            json!({ "member_id": m.id, "rank": "Sergeant", "station": "Nord" }),
        )
        .await;
    assert_eq!(eintrag.status, StatusCode::CREATED);
    let tf = eintrag.json["id"].clone();

    let motorrad = json!({ "registration_number": "KMA 123X", "model": "Boxer", "assigned_to": tf });
    let erstes = portal.post("/motorcycles", Some(&admin), motorrad.clone()).await;
    assert_eq!(erstes.status, StatusCode::CREATED);
    assert_eq!(erstes.json["status"], "available");

    let doppelt = portal.post("/motorcycles", Some(&admin), motorrad).await;
    assert_eq!(doppelt.status, StatusCode::CONFLICT);

    let liste = portal.get("/taskforce", Some(&admin)).await;
    assert_eq!(liste.json["taskforce_members"][0]["full_name"], "Otieno");
}

#[tokio::test]
async fn ankuendigungen_nur_aktive() {
    let portal = TestPortal::neu().await;
    let admin = portal.admin_token().await;

    portal
        .post(
            "/announcements",
            Some(&admin),
            json!({ "title": "Treffen", "message": "Samstag 10 Uhr" }),
        )
        .await;
    portal
        .post(
            "/announcements",
            Some(&admin),
            json!({ "title": "Alt", "message": "Vorbei", "is_active": false }),
        )
        .await;

    let liste = portal.get("/announcements", Some(&admin)).await;
    let eintraege = liste.json["announcements"].as_array().unwrap();
    assert_eq!(eintraege.len(), 1);
    assert_eq!(eintraege[0]["title"], "Treffen");
}
