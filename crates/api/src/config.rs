use std::path::PathBuf;

use slotbook_core::calendar::BookingCalendar;
use slotbook_core::config::{lookup_non_empty, parse_or, process_env, ConfigError};
use slotbook_db::DbConfig;

/// Wildcard entry in `CORS_ORIGINS` that allows any origin.
pub const ANY_ORIGIN: &str = "*";

/// Server configuration, resolved once at startup and never mutated.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Max wait for background tasks at shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Day boundaries and archival run time.
    pub calendar: BookingCalendar,
    /// Whether this process runs the nightly archival schedule.
    pub archive_enabled: bool,
    /// Frontend directory served at `/`, if any.
    pub static_dir: Option<PathBuf>,
    /// Booking store location and pool sizing.
    pub database: DbConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default        |
    /// |-------------------------|----------------|
    /// | `HOST`                  | `0.0.0.0`      |
    /// | `PORT`                  | `3000`         |
    /// | `CORS_ORIGINS`          | `*`            |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`           |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`           |
    /// | `BOOKING_TIMEZONE`      | `Asia/Kolkata` |
    /// | `ARCHIVE_RUN_AT`        | `00:00`        |
    /// | `ARCHIVE_ENABLED`       | `true`         |
    /// | `STATIC_DIR`            | unset          |
    ///
    /// Store variables are documented on [`DbConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup_non_empty(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".into());

        let cors_origins: Vec<String> = lookup_non_empty(&lookup, "CORS_ORIGINS")
            .unwrap_or_else(|| ANY_ORIGIN.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port: parse_or(&lookup, "PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            calendar: BookingCalendar::from_lookup(&lookup)?,
            archive_enabled: parse_or(&lookup, "ARCHIVE_ENABLED", true)?,
            static_dir: lookup_non_empty(&lookup, "STATIC_DIR").map(PathBuf::from),
            database: DbConfig::from_lookup(&lookup)?,
        })
    }

    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.allows_any_origin());
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.archive_enabled);
        assert!(config.static_dir.is_none());
        assert_eq!(config.calendar, BookingCalendar::default());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = ServerConfig::from_lookup(env(&[(
            "CORS_ORIGINS",
            "https://book.example.org, http://localhost:5173,,",
        )]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://book.example.org", "http://localhost:5173"]
        );
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn archive_can_be_disabled() {
        let config = ServerConfig::from_lookup(env(&[("ARCHIVE_ENABLED", "false")])).unwrap();
        assert!(!config.archive_enabled);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(env(&[("PORT", "70000")])).unwrap_err();
        assert!(err.to_string().starts_with("PORT"));
    }

    #[test]
    fn invalid_store_setting_is_an_error() {
        assert!(ServerConfig::from_lookup(env(&[("DB_PORT", "x")])).is_err());
    }
}
