//! Booking store: PostgreSQL pool, migrations and repositories.
//!
//! The pool is an explicitly constructed handle. The API binary opens it at
//! startup, injects it through `AppState`, and closes it at shutdown.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use slotbook_core::config::{lookup_non_empty, parse_or, process_env, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Name of the constraint that enforces one booking per slot per day.
pub const UQ_BOOKING_SLOT_DAY: &str = "uq_bookings_section_slot_day";

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Store location and pool sizing, resolved once at startup.
#[derive(Clone)]
pub struct DbConfig {
    /// Full connection URL; when set it wins over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Requests beyond this many concurrent connections queue for one.
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl DbConfig {
    /// Load store configuration from the process environment.
    ///
    /// | Env Var                   | Default        |
    /// |---------------------------|----------------|
    /// | `DATABASE_URL`            | unset          |
    /// | `DB_HOST`                 | `localhost`    |
    /// | `DB_PORT`                 | `5432`         |
    /// | `DB_USER`                 | `postgres`     |
    /// | `DB_PASSWORD`             | empty          |
    /// | `DB_NAME`                 | `slot_booking` |
    /// | `DB_MAX_CONNECTIONS`      | `10`           |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `30`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |var: &str, default: &str| {
            lookup_non_empty(&lookup, var).unwrap_or_else(|| default.to_string())
        };

        let max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "pool needs at least one connection".into(),
            });
        }

        let config = Self {
            url: lookup_non_empty(&lookup, "DATABASE_URL"),
            host: text("DB_HOST", "localhost"),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: text("DB_USER", "postgres"),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            database: text("DB_NAME", "slot_booking"),
            max_connections,
            acquire_timeout_secs: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?,
        };

        // Surface a malformed URL now rather than on first connect.
        config.connect_options()?;
        Ok(config)
    }

    /// Build connection options from the URL or the discrete fields.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(|e| ConfigError::Invalid {
                var: "DATABASE_URL",
                value: "<redacted>".into(),
                reason: e.to_string(),
            }),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)),
        }
    }
}

/// Create a bounded connection pool.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = config
        .connect_options()
        .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Liveness probe: one round trip through the pool.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// True when `err` is a unique violation on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
