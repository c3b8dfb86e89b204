use std::sync::Arc;

use slotbook_core::calendar::BookingCalendar;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Booking store connection pool.
    pub pool: slotbook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resolves "today" for slot queries and new bookings.
    pub calendar: BookingCalendar,
}

impl AppState {
    pub fn new(pool: slotbook_db::DbPool, config: ServerConfig) -> Self {
        let calendar = config.calendar;
        Self {
            pool,
            config: Arc::new(config),
            calendar,
        }
    }
}
