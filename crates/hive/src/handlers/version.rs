use axum::Json;

/// GET /version - Crate version as a JSON string.
#[axum::debug_handler]
pub async fn version() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}
