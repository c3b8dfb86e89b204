//! Booking day boundaries and the daily archival run time.
//!
//! "Today" is always the calendar day in the configured timezone, never the
//! database session's or the host's. Bookings carry that day explicitly so
//! the uniqueness constraint and the day filter agree with each other.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::config::{lookup_non_empty, process_env, ConfigError};
use crate::error::CoreError;
use crate::types::{Day, Timestamp};

/// Default zone: India Standard Time.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Calendar used to resolve booking days and schedule the archival pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingCalendar {
    tz: Tz,
    run_at: NaiveTime,
}

impl Default for BookingCalendar {
    fn default() -> Self {
        Self {
            tz: DEFAULT_TIMEZONE,
            run_at: NaiveTime::MIN,
        }
    }
}

impl BookingCalendar {
    pub fn new(tz: Tz, run_at: NaiveTime) -> Self {
        Self { tz, run_at }
    }

    /// Load the calendar from the process environment.
    ///
    /// | Env Var            | Default        |
    /// |--------------------|----------------|
    /// | `BOOKING_TIMEZONE` | `Asia/Kolkata` |
    /// | `ARCHIVE_RUN_AT`   | `00:00`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut calendar = Self::default();

        if let Some(raw) = lookup_non_empty(&lookup, "BOOKING_TIMEZONE") {
            calendar.tz = parse_timezone(&raw).map_err(|e| invalid("BOOKING_TIMEZONE", raw, e))?;
        }
        if let Some(raw) = lookup_non_empty(&lookup, "ARCHIVE_RUN_AT") {
            calendar.run_at = parse_run_at(&raw).map_err(|e| invalid("ARCHIVE_RUN_AT", raw, e))?;
        }

        Ok(calendar)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local time of day at which the archival pass runs.
    pub fn run_at(&self) -> NaiveTime {
        self.run_at
    }

    /// The booking day containing `instant`.
    pub fn day_of(&self, instant: Timestamp) -> Day {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The current booking day.
    pub fn today(&self) -> Day {
        self.day_of(Utc::now())
    }

    /// The first archival run strictly after `now`.
    pub fn next_run_after(&self, now: Timestamp) -> Timestamp {
        let local_now = now.with_timezone(&self.tz);
        let today = local_now.date_naive();

        let target_date = if local_now.time() >= self.run_at {
            today + Duration::days(1)
        } else {
            today
        };

        let naive = target_date.and_time(self.run_at);
        let target = naive
            .and_local_timezone(self.tz)
            .earliest()
            .or_else(|| {
                // Run time falls in a DST gap: take the first valid minute after it.
                (naive + Duration::hours(1))
                    .and_local_timezone(self.tz)
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| now + Duration::days(1));

        if target <= now {
            now + Duration::minutes(1)
        } else {
            target
        }
    }

    /// How long to sleep from `now` until the next archival run.
    pub fn until_next_run(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.next_run_after(now) - now)
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}

fn invalid(var: &'static str, value: String, err: CoreError) -> ConfigError {
    let reason = match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    };
    ConfigError::Invalid { var, value, reason }
}

/// Parse an IANA timezone name such as `Asia/Kolkata`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone '{name}'")))
}

/// Parse a local run time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_run_at(value: &str) -> Result<NaiveTime, CoreError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::Validation(format!("Invalid run time '{value}', expected HH:MM")))
}
