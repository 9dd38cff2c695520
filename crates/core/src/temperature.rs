//! Pure temperature aggregation.
//!
//! Averages the latest temperature of every resolved sense box whose
//! reading falls inside the measurement window, then classifies it.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::sensebox::SenseBox;

/// Readings older than this are ignored, however fresh the cache entry is.
pub const MEASUREMENT_WINDOW: TimeDelta = TimeDelta::hours(1);

/// Lowest temperature still classified as [`TemperatureStatus::Good`].
pub const GOOD_MIN: f64 = 10.0;
/// Highest temperature still classified as [`TemperatureStatus::Good`].
pub const GOOD_MAX: f64 = 37.0;

/// Classification of an average temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureStatus {
    #[serde(rename = "No values present")]
    None,
    #[serde(rename = "Too Cold")]
    TooCold,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Too Hot")]
    TooHot,
}

/// Body of `GET /temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub status: TemperatureStatus,
    pub temperature: Option<f64>,
}

impl TemperatureReading {
    /// Builds a reading, classifying the given average.
    pub fn new(temperature: Option<f64>) -> Self {
        Self {
            status: status_for(temperature),
            temperature,
        }
    }
}

/// Classifies a temperature. Both bounds of the good range are inclusive.
pub fn status_for(temperature: Option<f64>) -> TemperatureStatus {
    match temperature {
        None => TemperatureStatus::None,
        Some(t) if t < GOOD_MIN => TemperatureStatus::TooCold,
        Some(t) if t <= GOOD_MAX => TemperatureStatus::Good,
        Some(_) => TemperatureStatus::TooHot,
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average of the latest in-window temperature of each resolved sense box.
///
/// Unresolved boxes (`None`), boxes without readings, and readings taken at
/// or before `now - MEASUREMENT_WINDOW` are skipped. Returns `None` when
/// nothing is left.
pub fn average_temperature(sense_boxes: &[Option<SenseBox>], now: DateTime<Utc>) -> Option<f64> {
    let window_start = now - MEASUREMENT_WINDOW;

    let values: Vec<f64> = sense_boxes
        .iter()
        .flatten()
        .filter_map(SenseBox::latest_temperature)
        .filter(|measurement| measurement.created_at > window_start)
        .map(|measurement| measurement.value)
        .collect();

    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round_to_cents(mean))
}
