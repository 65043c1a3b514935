//! Integration-Tests fuer Ankuendigungen, Protokolle, Task Force und Motorraeder

use chrono::NaiveDate;
use oya_core::{Mitgliedsstatus, Rolle};
use oya_db::{
    models::{AnkuendigungDaten, MotorradDaten, NeuesMitglied, ProtokollDaten, TaskForceDaten},
    AnnouncementRepository, MemberRepository, MinutesRepository, MotorcycleRepository, SqliteDb,
    TaskForceRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

#[tokio::test]
async fn nur_aktive_ankuendigungen() {
    let db = db().await;
    let aktiv = AnnouncementRepository::create(
        &db,
        AnkuendigungDaten {
            title: "Versammlung".into(),
            message: "Samstag 10 Uhr".into(),
            is_active: true,
        },
        None,
    )
    .await
    .unwrap();
    AnnouncementRepository::create(
        &db,
        AnkuendigungDaten {
            title: "Alt".into(),
            message: "vorbei".into(),
            is_active: false,
        },
        None,
    )
    .await
    .unwrap();

    let liste = AnnouncementRepository::list_active(&db).await.unwrap();
    assert_eq!(liste.len(), 1);
    assert_eq!(liste[0].id, aktiv.id);

    AnnouncementRepository::update(
        &db,
        aktiv.id,
        AnkuendigungDaten {
            title: "Versammlung".into(),
            message: "abgesagt".into(),
            is_active: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(AnnouncementRepository::count_active(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn protokolle_neueste_zuerst() {
    let db = db().await;
    for (titel, monat) in [("Januar", 1), ("Maerz", 3), ("Februar", 2)] {
        MinutesRepository::create(
            &db,
            ProtokollDaten {
                title: titel.into(),
                meeting_date: NaiveDate::from_ymd_opt(2024, monat, 1).unwrap(),
                content: "...".into(),
            },
            None,
        )
        .await
        .unwrap();
    }

    let liste = MinutesRepository::list(&db).await.unwrap();
    let titel: Vec<_> = liste.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titel, ["Maerz", "Februar", "Januar"]);
}

#[tokio::test]
async fn taskforce_und_motorrad() {
    let db = db().await;
    let m = MemberRepository::create(
        &db,
        NeuesMitglied {
            serial_number: "TF-1",
            full_name: "Fahrer",
            phone_number: "",
            pin_hash: "hash",
            role: Rolle::Mitglied,
            status: Mitgliedsstatus::Active,
        },
    )
    .await
    .unwrap();

    let tf = TaskForceRepository::create(
        &db,
        TaskForceDaten {
            member_id: m.id,
            rank: "Sergeant".into(),
            station: Some("Nord".into()),
            joined_on: None,
        },
    )
    .await
    .unwrap();

    let daten = MotorradDaten {
        registration_number: "KMAB 123C".into(),
        model: "Honda".into(),
        assigned_to: Some(tf.id),
        status: "assigned".into(),
    };
    MotorcycleRepository::create(&db, daten.clone()).await.unwrap();
    let err = MotorcycleRepository::create(&db, daten).await.unwrap_err();
    assert!(err.ist_eindeutigkeit());

    // Loeschen des Task-Force-Eintrags gibt das Motorrad frei
    assert!(TaskForceRepository::delete(&db, tf.id).await.unwrap());
    let motorraeder = MotorcycleRepository::list(&db).await.unwrap();
    assert_eq!(motorraeder.len(), 1);
    assert!(motorraeder[0].assigned_to.is_none());
}
