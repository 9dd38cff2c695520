//! Average temperature endpoint.

use axum::{extract::State, Json};

use hive_core::temperature::TemperatureReading;

use crate::state::AppState;

/// GET /temperature - Average temperature of the configured sense boxes.
///
/// Always 200; without usable readings the status is "No values present"
/// and the temperature is null.
#[axum::debug_handler]
pub async fn get_temperature(State(state): State<AppState>) -> Json<TemperatureReading> {
    Json(state.temperature.get_temperature().await)
}
