use axum::routing::get;
use axum::Router;

use crate::handlers::slots;
use crate::state::AppState;

/// Slot status routes mounted at `/slots`.
///
/// ```text
/// GET /{section_id}/{slot_number}  -> get_slot_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{section_id}/{slot_number}",
        get(slots::get_slot_status),
    )
}
