use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use slotbook_core::booking::MSG_SLOT_ALREADY_BOOKED;
use slotbook_core::error::CoreError;
use slotbook_db::{is_unique_violation, UQ_BOOKING_SLOT_DAY};

/// Body text for every 500 response. Internal detail goes to the log only.
pub const MSG_SERVER_ERROR: &str = "Server error";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "message": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `slotbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A booking store error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The conflict returned whenever a slot is already taken, whether the
    /// pre-check or the unique constraint caught it.
    pub fn slot_already_booked() -> Self {
        AppError::Core(CoreError::Conflict(MSG_SLOT_ALREADY_BOOKED.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            // --- Store errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - A unique violation on the per-slot-per-day constraint maps to 409 with
///   the same message as the pre-check.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if is_unique_violation(err, UQ_BOOKING_SLOT_DAY) {
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            MSG_SLOT_ALREADY_BOOKED.to_string(),
        );
    }

    tracing::error!(error = %err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        MSG_SERVER_ERROR.to_string(),
    )
}
