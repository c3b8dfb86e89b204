use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use slotbook_core::types::Timestamp;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `OK` when the store answers, `ERROR` otherwise.
    pub status: &'static str,
    pub timestamp: Timestamp,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the booking store is reachable.
    pub db_healthy: bool,
}

/// GET /api/health -- 200 when the store answers a probe, 500 otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let probe = slotbook_db::health_check(&state.pool).await;
    if let Err(e) = &probe {
        tracing::error!(error = %e, operation = "health_check", "Store liveness probe failed");
    }

    let db_healthy = probe.is_ok();
    let (status_code, status) = if db_healthy {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "ERROR")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }),
    )
}

/// Mount health check routes (nested under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
