use axum::{extract::State, http::StatusCode};
use sea_orm::DbErr;

use crate::state::AppState;

fn readiness(ping: Result<(), DbErr>) -> StatusCode {
    match ping {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

// ── GET /healthz ─────────────────────────────────────────────────────────────

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// Ready once the database answers a ping; 503 until then.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}
