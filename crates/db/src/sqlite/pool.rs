//! SQLite-Pool des Portals
//!
//! Jede Verbindung laeuft mit Fremdschluesseln und Busy-Timeout, damit
//! die Transaktionen fuer Exekutive und Amtszeiten bei parallelen
//! Schreibern warten statt sofort zu scheitern.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;
use crate::repository::{DatabaseConfig, DbResult};

/// Wartezeit, bevor ein gesperrter Schreibzugriff als Konflikt gilt
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Geteilter Zugriff auf die Portal-Datenbank; implementiert alle Repository-Traits
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erstellt) die Datenbankdatei und bringt das Schema auf Stand
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let opts = basis_optionen(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal);

        let db = Self::verbinden(
            SqlitePoolOptions::new().max_connections(config.max_verbindungen.max(1)),
            opts,
        )
        .await?;
        tracing::info!(
            url = %config.url,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "Portal-Datenbank geoeffnet"
        );
        Ok(db)
    }

    /// Leere Datenbank im Speicher mit angewendetem Schema (Tests)
    ///
    /// Genau eine Verbindung, die nie abgebaut wird; sonst verschwindet
    /// die Datenbank mit ihr.
    pub async fn in_memory() -> DbResult<Self> {
        Self::verbinden(
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            basis_optionen(IN_MEMORY_URL)?,
        )
        .await
    }

    async fn verbinden(pool_opts: SqlitePoolOptions, opts: SqliteConnectOptions) -> DbResult<Self> {
        let pool = pool_opts.connect_with(opts).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("Schema-Migrationen angewendet");
        Ok(Self { pool })
    }

    /// Einfache Abfrage fuer den Health-Check
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Schliesst alle Verbindungen (beim Herunterfahren)
    pub async fn schliessen(&self) {
        self.pool.close().await;
    }
}

fn basis_optionen(url: &str) -> Result<SqliteConnectOptions, DbError> {
    Ok(SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT))
}
