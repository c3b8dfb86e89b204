pub mod bookings;
pub mod health;
pub mod slots;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                   liveness (store probe)
/// /slots/{section_id}/{slot_number}         slot status for today
/// /bookings                                 create booking (POST)
/// /bookings/today                           today's bookings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/slots", slots::router())
        .nest("/bookings", bookings::router())
}
