//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (upstream quorum, then cache grace period)

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Queries every configured sense box live. Returns 200 while the upstream
/// quorum holds or a recent cache write covers for it, 503 otherwise.
/// The body is always empty.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    if state.availability.is_available().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
