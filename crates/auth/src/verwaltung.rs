//! Verwaltung der Exekutive: Positionen besetzen und Amtszeiten aktivieren
//!
//! Die Exklusivitaet (ein Inhaber pro Position, eine aktive Amtszeit) liegt
//! in den Repository-Transaktionen. Bei gleichzeitigen Zuweisungen gewinnt
//! der letzte Schreiber; ein Sperrkonflikt kommt als wiederholbarer Fehler
//! zurueck.

use std::sync::Arc;

use oya_core::ExekutivPosition;
use oya_db::{
    models::{AmtszeitRecord, AmtszeitUpdate, ExekutiveRecord, NeueAmtszeit},
    DbError, ExecutiveRepository, TenureRepository,
};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

pub struct VerwaltungService {
    exekutive: Arc<dyn ExecutiveRepository>,
    amtszeiten: Arc<dyn TenureRepository>,
}

impl VerwaltungService {
    pub fn neu(
        exekutive: Arc<dyn ExecutiveRepository>,
        amtszeiten: Arc<dyn TenureRepository>,
    ) -> Self {
        Self {
            exekutive,
            amtszeiten,
        }
    }

    /// Besetzt eine Position; ein bisheriger Inhaber wird verdraengt
    pub async fn exekutive_zuweisen(
        &self,
        member_id: Uuid,
        position: ExekutivPosition,
    ) -> AuthResult<ExekutiveRecord> {
        self.exekutive
            .assign(member_id, position)
            .await
            .map_err(|e| match e {
                DbError::NichtGefunden(_) => AuthError::MitgliedNichtGefunden(member_id.to_string()),
                andere => AuthError::Datenbank(andere),
            })
    }

    pub async fn exekutive_entfernen(&self, id: Uuid) -> AuthResult<bool> {
        Ok(self.exekutive.remove(id).await?)
    }

    /// Legt eine neue Amtszeit an und macht sie zur einzigen aktiven
    pub async fn amtszeit_hinzufuegen(
        &self,
        name: &str,
        start_year: i32,
        end_year: Option<i32>,
    ) -> AuthResult<AmtszeitRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::UngueltigeEingabe("Name der Amtszeit fehlt".into()));
        }
        jahre_pruefen(start_year, end_year)?;

        Ok(self
            .amtszeiten
            .create_active(NeueAmtszeit {
                name,
                start_year,
                end_year,
            })
            .await?)
    }

    pub async fn amtszeit_bearbeiten(
        &self,
        id: Uuid,
        update: AmtszeitUpdate,
    ) -> AuthResult<AmtszeitRecord> {
        let bisher = self
            .amtszeiten
            .get(id)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Amtszeit {id}")))?;

        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(AuthError::UngueltigeEingabe("Name der Amtszeit fehlt".into()));
            }
        }
        jahre_pruefen(
            update.start_year.unwrap_or(bisher.start_year),
            update.end_year.unwrap_or(bisher.end_year),
        )?;

        Ok(self.amtszeiten.update(id, update).await?)
    }

    pub async fn aktive_amtszeit(&self) -> AuthResult<Option<AmtszeitRecord>> {
        Ok(self.amtszeiten.get_active().await?)
    }
}

fn jahre_pruefen(start_year: i32, end_year: Option<i32>) -> AuthResult<()> {
    match end_year {
        Some(ende) if ende < start_year => Err(AuthError::UngueltigeEingabe(format!(
            "Endjahr {ende} liegt vor Startjahr {start_year}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oya_core::{Mitgliedsstatus, Rolle};
    use oya_db::{models::NeuesMitglied, MemberRepository, SqliteDb};

    async fn service() -> (VerwaltungService, Arc<SqliteDb>) {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        (VerwaltungService::neu(db.clone(), db.clone()), db)
    }

    async fn mitglied(db: &SqliteDb, serial: &str) -> Uuid {
        MemberRepository::create(
            db,
            NeuesMitglied {
                serial_number: serial,
                full_name: serial,
                phone_number: "",
                pin_hash: "hash",
                role: Rolle::Mitglied,
                status: Mitgliedsstatus::Active,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn zweite_zuweisung_ersetzt_ersten_inhaber() {
        let (service, db) = service().await;
        let a = mitglied(&db, "A").await;
        let b = mitglied(&db, "B").await;

        service
            .exekutive_zuweisen(a, ExekutivPosition::Chairman)
            .await
            .unwrap();
        service
            .exekutive_zuweisen(b, ExekutivPosition::Chairman)
            .await
            .unwrap();

        let inhaber = db.holder_of(ExekutivPosition::Chairman).await.unwrap();
        assert_eq!(inhaber.len(), 1);
        assert_eq!(inhaber[0].member_id, b);
    }

    #[tokio::test]
    async fn unbekanntes_mitglied() {
        let (service, _) = service().await;
        let err = service
            .exekutive_zuweisen(Uuid::new_v4(), ExekutivPosition::Treasurer)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MitgliedNichtGefunden(_)));
    }

    #[tokio::test]
    async fn amtszeit_validierung() {
        let (service, _) = service().await;
        assert!(matches!(
            service.amtszeit_hinzufuegen("  ", 2024, None).await,
            Err(AuthError::UngueltigeEingabe(_))
        ));
        assert!(matches!(
            service.amtszeit_hinzufuegen("2024", 2024, Some(2023)).await,
            Err(AuthError::UngueltigeEingabe(_))
        ));

        let t = service
            .amtszeit_hinzufuegen("2024-2026", 2024, Some(2026))
            .await
            .unwrap();
        assert!(t.is_active);

        let err = service
            .amtszeit_bearbeiten(
                t.id,
                AmtszeitUpdate {
                    start_year: Some(2030),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UngueltigeEingabe(_)));
    }

    #[tokio::test]
    async fn neue_amtszeit_deaktiviert_alte() {
        let (service, _) = service().await;
        service.amtszeit_hinzufuegen("Alt", 2020, Some(2022)).await.unwrap();
        let neu = service.amtszeit_hinzufuegen("Neu", 2022, None).await.unwrap();

        let aktiv = service.aktive_amtszeit().await.unwrap().unwrap();
        assert_eq!(aktiv.id, neu.id);
    }
}
