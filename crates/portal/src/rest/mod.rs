//! REST-Interface des OYA-Portals

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use oya_auth::{AuthService, VerwaltungService};
use oya_db::{
    AnnouncementRepository, ContributionRepository, ExecutiveRepository, ExpenseRepository,
    IncomeRepository, MemberRepository, MinutesRepository, MotorcycleRepository,
    ProjectRepository, SqliteDb, TaskForceRepository, TenureRepository,
};

/// Name des Session-Cookies, falls nichts konfiguriert ist
pub const STANDARD_COOKIE_NAME: &str = "oya_session";

/// Einstellungen fuer das Session-Cookie
#[derive(Debug, Clone)]
pub struct CookieKonfig {
    pub name: String,
    /// Setzt das `Secure`-Attribut (nur ueber HTTPS senden)
    pub secure: bool,
}

impl Default for CookieKonfig {
    fn default() -> Self {
        Self {
            name: STANDARD_COOKIE_NAME.into(),
            secure: false,
        }
    }
}

/// Axum-State fuer den Portal-REST-Server
#[derive(Clone)]
pub struct PortalState {
    pub db: Arc<SqliteDb>,
    pub auth: Arc<AuthService>,
    pub verwaltung: Arc<VerwaltungService>,
    pub cookie: CookieKonfig,
}

// Die Zugriffsmethoden legen fest, ueber welches Repository-Trait ein
// Handler auf `SqliteDb` zugreift.
impl PortalState {
    pub fn neu(
        db: Arc<SqliteDb>,
        auth: Arc<AuthService>,
        verwaltung: Arc<VerwaltungService>,
        cookie: CookieKonfig,
    ) -> Self {
        Self {
            db,
            auth,
            verwaltung,
            cookie,
        }
    }

    pub fn mitglieder(&self) -> &dyn MemberRepository {
        &*self.db
    }

    pub fn exekutive(&self) -> &dyn ExecutiveRepository {
        &*self.db
    }

    pub fn amtszeiten(&self) -> &dyn TenureRepository {
        &*self.db
    }

    pub fn beitraege(&self) -> &dyn ContributionRepository {
        &*self.db
    }

    pub fn einnahmen(&self) -> &dyn IncomeRepository {
        &*self.db
    }

    pub fn ausgaben(&self) -> &dyn ExpenseRepository {
        &*self.db
    }

    pub fn projekte(&self) -> &dyn ProjectRepository {
        &*self.db
    }

    pub fn taskforce(&self) -> &dyn TaskForceRepository {
        &*self.db
    }

    pub fn motorraeder(&self) -> &dyn MotorcycleRepository {
        &*self.db
    }

    pub fn ankuendigungen(&self) -> &dyn AnnouncementRepository {
        &*self.db
    }

    pub fn protokolle(&self) -> &dyn MinutesRepository {
        &*self.db
    }
}

pub use server::{RestServer, RestServerKonfig};
