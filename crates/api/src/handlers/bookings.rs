//! Handlers for creating bookings and listing today's bookings.
//!
//! Creation validates the body before touching the store, runs an advisory
//! availability check, then inserts. The unique constraint on
//! (section, slot, day) is what actually prevents double booking; losing
//! that race returns the same conflict as the pre-check.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use slotbook_core::booking::MSG_BOOKING_SUCCESSFUL;
use slotbook_core::error::CoreError;
use slotbook_core::types::DbId;
use slotbook_db::models::booking::CreateBookingRequest;
use slotbook_db::repositories::BookingRepo;
use slotbook_db::{is_unique_violation, UQ_BOOKING_SLOT_DAY};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response for a successful `POST /api/bookings`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub message: &'static str,
    pub booking_id: DbId,
}

/// POST /api/bookings
///
/// Create a booking for today. Returns 201 with the new id, 400 on missing
/// or malformed fields, 409 when the slot is already taken.
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|rejection| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    })?;
    let booking = input.validate()?;

    let now = Utc::now();
    let day = state.calendar.day_of(now);
    let (section_id, slot_number) = (booking.section_id, booking.slot_number);

    let taken = BookingRepo::is_slot_booked(&state.pool, section_id, slot_number, day)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                operation = "is_slot_booked",
                section_id,
                slot_number,
                %day,
                "Availability check failed",
            );
        })?;
    if taken {
        tracing::debug!(section_id, slot_number, %day, "Slot already booked");
        return Err(AppError::slot_already_booked());
    }

    let created = match BookingRepo::create(&state.pool, &booking, now, day).await {
        Ok(created) => created,
        Err(e) if is_unique_violation(&e, UQ_BOOKING_SLOT_DAY) => {
            tracing::info!(
                section_id,
                slot_number,
                %day,
                "Concurrent booking won the slot",
            );
            return Err(AppError::slot_already_booked());
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                operation = "create_booking",
                section_id,
                slot_number,
                %day,
                "Booking insert failed",
            );
            return Err(e.into());
        }
    };

    tracing::info!(
        booking_id = created.id,
        section_id,
        slot_number,
        %day,
        "Booking created",
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingCreated {
            message: MSG_BOOKING_SUCCESSFUL,
            booking_id: created.id,
        }),
    ))
}

/// GET /api/bookings/today
///
/// All active bookings for today, ordered by section then slot.
pub async fn list_today(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let day = state.calendar.today();

    let bookings = BookingRepo::list_for_day(&state.pool, day)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                operation = "list_bookings",
                %day,
                "Listing today's bookings failed",
            );
        })?;

    Ok(Json(bookings))
}
