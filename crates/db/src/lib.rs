//! oya-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit. Die Standard-
//! Implementierung ist SQLite ueber sqlx; das Schema liegt unter
//! `migrations/` und wird beim Oeffnen automatisch angewendet.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    AnnouncementRepository, ContributionRepository, DatabaseConfig, DbResult,
    ExecutiveRepository, ExpenseRepository, IncomeRepository, MemberRepository,
    MinutesRepository, MotorcycleRepository, ProjectRepository, SessionRepository,
    TaskForceRepository, TenureRepository,
};
pub use sqlite::SqliteDb;
