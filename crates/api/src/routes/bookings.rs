use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Booking routes mounted at `/bookings`.
///
/// ```text
/// POST /        -> create_booking
/// GET  /today   -> list_today
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::create_booking))
        .route("/today", get(bookings::list_today))
}
