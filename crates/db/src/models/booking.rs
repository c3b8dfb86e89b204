//! Booking models and DTOs.
//!
//! Rows serialize in camelCase because the booking page reads them directly.

use serde::{Deserialize, Serialize};
use slotbook_core::booking::{require_id, require_text, validate_mobile, validate_text_len};
use slotbook_core::error::CoreError;
use slotbook_core::types::{DbId, Day, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: DbId,
    pub section_id: i32,
    pub slot_number: i32,
    pub full_name: String,
    pub place: String,
    pub mobile: String,
    pub booking_date: Timestamp,
    pub booking_day: Day,
    pub created_at: Timestamp,
}

/// A row from the `booking_archive` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedBooking {
    pub id: DbId,
    pub section_id: i32,
    pub slot_number: i32,
    pub full_name: String,
    pub place: String,
    pub mobile: String,
    pub booking_date: Timestamp,
    pub booking_day: Day,
    pub created_at: Timestamp,
    pub archived_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Raw `POST /api/bookings` body.
///
/// Every field is optional so a missing field is reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub section_id: Option<i32>,
    pub slot_number: Option<i32>,
    pub full_name: Option<String>,
    pub place: Option<String>,
    pub mobile: Option<String>,
}

/// A validated booking ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub section_id: i32,
    pub slot_number: i32,
    pub full_name: String,
    pub place: String,
    pub mobile: String,
}

impl CreateBookingRequest {
    /// Check presence of all five fields, then text lengths and mobile format.
    pub fn validate(&self) -> Result<NewBooking, CoreError> {
        let section_id = require_id(self.section_id)?;
        let slot_number = require_id(self.slot_number)?;
        let full_name = require_text(self.full_name.as_deref())?;
        let place = require_text(self.place.as_deref())?;
        let mobile = require_text(self.mobile.as_deref())?;

        validate_text_len("fullName", full_name)?;
        validate_text_len("place", place)?;
        validate_mobile(mobile)?;

        Ok(NewBooking {
            section_id,
            slot_number,
            full_name: full_name.to_string(),
            place: place.to_string(),
            mobile: mobile.to_string(),
        })
    }
}
