//! Integration-Tests fuer MemberRepository (In-Memory SQLite)

use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::{
    models::{MitgliedUpdate, NeuesMitglied},
    MemberRepository, SqliteDb,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neues_mitglied<'a>(serial: &'a str, name: &'a str) -> NeuesMitglied<'a> {
    NeuesMitglied {
        serial_number: serial,
        full_name: name,
        phone_number: "0700000000",
        pin_hash: "hash",
        role: Rolle::Mitglied,
        status: Mitgliedsstatus::Active,
    }
}

#[tokio::test]
async fn mitglied_erstellen_und_laden() {
    let db = db().await;

    let m = MemberRepository::create(&db, neues_mitglied("OYA-001", "Amina Otieno"))
        .await
        .expect("Mitglied erstellen fehlgeschlagen");

    assert_eq!(m.serial_number, "OYA-001");
    assert_eq!(m.role, Rolle::Mitglied);
    assert!(m.ist_aktiv());
    assert!(m.executive_position.is_none());

    let geladen = MemberRepository::get_by_serial(&db, "OYA-001")
        .await
        .unwrap()
        .expect("Mitglied sollte gefunden werden");
    assert_eq!(geladen.id, m.id);
    assert_eq!(geladen.pin_hash, "hash");
}

#[tokio::test]
async fn doppelte_seriennummer_schlaegt_fehl() {
    let db = db().await;
    MemberRepository::create(&db, neues_mitglied("OYA-002", "A"))
        .await
        .unwrap();

    let err = MemberRepository::create(&db, neues_mitglied("OYA-002", "B"))
        .await
        .unwrap_err();
    assert!(err.ist_eindeutigkeit());
}

#[tokio::test]
async fn mitglied_aktualisieren() {
    let db = db().await;
    let m = MemberRepository::create(&db, neues_mitglied("OYA-003", "Alt"))
        .await
        .unwrap();

    let neu = MemberRepository::update(
        &db,
        m.id,
        MitgliedUpdate {
            full_name: Some("Neu".into()),
            status: Some(Mitgliedsstatus::Inactive),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(neu.full_name, "Neu");
    assert!(!neu.ist_aktiv());
    assert_eq!(neu.serial_number, "OYA-003");
}

#[tokio::test]
async fn unbekanntes_mitglied_aktualisieren_gibt_nicht_gefunden() {
    let db = db().await;
    let err = MemberRepository::update(
        &db,
        uuid::Uuid::new_v4(),
        MitgliedUpdate {
            full_name: Some("X".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, oya_db::DbError::NichtGefunden(_)));
}

#[tokio::test]
async fn suche_filtert_case_insensitiv() {
    let db = db().await;
    MemberRepository::create(&db, neues_mitglied("OYA-010", "Grace Wanjiru"))
        .await
        .unwrap();
    MemberRepository::create(&db, neues_mitglied("OYA-011", "Peter Kamau"))
        .await
        .unwrap();

    let treffer = MemberRepository::list(&db, Some("wanJIRU")).await.unwrap();
    assert_eq!(treffer.len(), 1);
    assert_eq!(treffer[0].serial_number, "OYA-010");

    let per_serial = MemberRepository::list(&db, Some("oya-011")).await.unwrap();
    assert_eq!(per_serial.len(), 1);

    let alle = MemberRepository::list(&db, Some("   ")).await.unwrap();
    assert_eq!(alle.len(), 2);
    assert_eq!(MemberRepository::count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn suche_behandelt_platzhalter_woertlich() {
    let db = db().await;
    MemberRepository::create(&db, neues_mitglied("OYA_020", "Halima Said"))
        .await
        .unwrap();
    MemberRepository::create(&db, neues_mitglied("OYA-021", "Otieno 100% Juma"))
        .await
        .unwrap();
    MemberRepository::create(&db, neues_mitglied("OYA-022", "Kevin Mwangi"))
        .await
        .unwrap();

    let unterstrich = MemberRepository::list(&db, Some("_")).await.unwrap();
    assert_eq!(unterstrich.len(), 1);
    assert_eq!(unterstrich[0].serial_number, "OYA_020");

    let prozent = MemberRepository::list(&db, Some("%")).await.unwrap();
    assert_eq!(prozent.len(), 1);
    assert_eq!(prozent[0].serial_number, "OYA-021");

    assert!(MemberRepository::list(&db, Some("\\")).await.unwrap().is_empty());
    assert_eq!(MemberRepository::list(&db, Some("oya")).await.unwrap().len(), 3);
}

#[tokio::test]
async fn letzter_login_wird_gesetzt() {
    let db = db().await;
    let m = MemberRepository::create(&db, neues_mitglied("OYA-020", "Login"))
        .await
        .unwrap();

    MemberRepository::update_last_login(&db, m.id).await.unwrap();

    let geladen = MemberRepository::get_by_id(&db, m.id)
        .await
        .unwrap()
        .unwrap();
    assert!(geladen.last_login.is_some());
}

#[tokio::test]
async fn mitglied_loeschen() {
    let db = db().await;
    let m = MemberRepository::create(&db, neues_mitglied("OYA-030", "Weg"))
        .await
        .unwrap();

    assert!(MemberRepository::delete(&db, m.id).await.unwrap());
    assert!(!MemberRepository::delete(&db, m.id).await.unwrap());
    assert!(MemberRepository::get_by_id(&db, m.id).await.unwrap().is_none());
}
