//! Auth Gate: `sitzung_erfordern` und `rolle_erfordern`
//!
//! Beide Guards laufen vor jeder Geschaeftslogik. `sitzung_erfordern` muss
//! zuerst geprueft werden, sonst wuerde eine fehlende Session als
//! Rechteproblem gemeldet.

use oya_core::Rolle;
use oya_db::models::MitgliedRecord;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::service::AuthService;

/// Aufgeloeste Session eines Requests
#[derive(Debug, Clone)]
pub struct Sitzung {
    pub token: String,
    /// Aktueller Stand aus dem Credential Store
    pub mitglied: MitgliedRecord,
}

impl Sitzung {
    pub fn member_id(&self) -> Uuid {
        self.mitglied.id
    }

    pub fn rolle(&self) -> Rolle {
        self.mitglied.role
    }
}

/// Schlaegt mit `NichtAuthentifiziert` fehl, wenn kein gueltiges Token vorliegt
pub async fn sitzung_erfordern(auth: &AuthService, token: Option<&str>) -> AuthResult<Sitzung> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::NichtAuthentifiziert)?;
    auth.session_validieren(token).await
}

/// Schlaegt mit `Verboten` fehl, wenn die Rolle unter `minimum` liegt
pub fn rolle_erfordern(sitzung: &Sitzung, minimum: Rolle) -> AuthResult<()> {
    if sitzung.rolle().erfuellt(minimum) {
        Ok(())
    } else {
        tracing::debug!(
            member_id = %sitzung.member_id(),
            rolle = %sitzung.rolle(),
            benoetigt = %minimum,
            "Zugriff verweigert"
        );
        Err(AuthError::Verboten { benoetigt: minimum })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use oya_core::Mitgliedsstatus;

    fn sitzung_mit(rolle: Rolle) -> Sitzung {
        Sitzung {
            token: "t".into(),
            mitglied: MitgliedRecord {
                id: Uuid::new_v4(),
                serial_number: "S".into(),
                full_name: "S".into(),
                phone_number: String::new(),
                pin_hash: String::new(),
                role: rolle,
                executive_position: None,
                status: Mitgliedsstatus::Active,
                created_at: Utc::now(),
                last_login: None,
            },
        }
    }

    #[test]
    fn rollen_total_geordnet() {
        for hat in Rolle::ALLE {
            for minimum in Rolle::ALLE {
                let ergebnis = rolle_erfordern(&sitzung_mit(hat), minimum);
                assert_eq!(ergebnis.is_ok(), hat >= minimum, "{hat} vs {minimum}");
            }
        }
    }

    #[test]
    fn admin_erforderlich() {
        assert!(rolle_erfordern(&sitzung_mit(Rolle::Admin), Rolle::Admin).is_ok());
        assert!(matches!(
            rolle_erfordern(&sitzung_mit(Rolle::Mitglied), Rolle::Admin),
            Err(AuthError::Verboten {
                benoetigt: Rolle::Admin
            })
        ));
        assert!(rolle_erfordern(&sitzung_mit(Rolle::Exekutive), Rolle::Admin).is_err());
    }
}
