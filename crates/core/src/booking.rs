//! Booking constants and input validators.
//!
//! Sections and slots form a fixed 5x5 grid per day. The grid bounds are
//! exported for clients and tests; the service itself does not reject
//! out-of-range numbers when answering slot-status queries.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Grid constants
// ---------------------------------------------------------------------------

/// Number of sections shown on the booking page.
pub const SECTION_COUNT: i32 = 5;

/// Number of bookable slots in every section.
pub const SLOTS_PER_SECTION: i32 = 5;

/// Maximum length of `fullName` and `place` (matches the column width the
/// booking form was designed around).
pub const MAX_TEXT_LEN: usize = 100;

// ---------------------------------------------------------------------------
// User-visible messages
// ---------------------------------------------------------------------------

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_INVALID_MOBILE: &str = "Invalid mobile number";
pub const MSG_SLOT_ALREADY_BOOKED: &str = "This slot is already booked";
pub const MSG_BOOKING_SUCCESSFUL: &str = "Booking successful";

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// Every `(section_id, slot_number)` pair on the grid, section-major.
pub fn all_slots() -> impl Iterator<Item = (i32, i32)> {
    (1..=SECTION_COUNT).flat_map(|s| (1..=SLOTS_PER_SECTION).map(move |n| (s, n)))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Require a numeric field to be present and non-zero.
pub fn require_id(value: Option<i32>) -> Result<i32, CoreError> {
    match value {
        Some(v) if v != 0 => Ok(v),
        _ => Err(CoreError::Validation(MSG_FIELDS_REQUIRED.into())),
    }
}

/// Require a text field to be present and non-blank. Returns the trimmed value.
pub fn require_text(value: Option<&str>) -> Result<&str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(MSG_FIELDS_REQUIRED.into())),
    }
}

/// Validate the length of a free-text field (`fullName`, `place`).
pub fn validate_text_len(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a mobile number: exactly ten ASCII digits.
pub fn validate_mobile(mobile: &str) -> Result<(), CoreError> {
    if !MOBILE_RE.is_match(mobile) {
        return Err(CoreError::Validation(MSG_INVALID_MOBILE.into()));
    }
    Ok(())
}
