//! Handler for the per-slot availability query the booking page polls.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use slotbook_db::repositories::BookingRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response for `GET /api/slots/{sectionId}/{slotNumber}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatus {
    pub is_booked: bool,
}

/// GET /api/slots/{section_id}/{slot_number}
///
/// Whether the slot is booked today. Numbers outside the 5x5 grid are not
/// rejected; they simply report not booked.
pub async fn get_slot_status(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> AppResult<Json<SlotStatus>> {
    let Path((section_id, slot_number)) =
        path.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let day = state.calendar.today();

    let is_booked = BookingRepo::is_slot_booked(&state.pool, section_id, slot_number, day)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                operation = "is_slot_booked",
                section_id,
                slot_number,
                %day,
                "Slot status query failed",
            );
        })?;

    Ok(Json(SlotStatus { is_booked }))
}
