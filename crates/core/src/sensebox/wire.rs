//! openSenseMap wire schemas and their explicit decoding into the domain.
//!
//! The response structs mirror `GET /boxes/{id}` exactly; nothing outside
//! this module sees the wire field names.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::types::{Measurement, SenseBox, Sensor};
use crate::serde::{deserialize_decimal, deserialize_optional_string};

/// Errors produced while decoding an upstream payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed sense box payload: {0}")]
    Malformed(String),
    #[error("Sense box payload has an empty id")]
    MissingId,
    #[error("Sensor {sensor_id} reported a non-finite value")]
    NonFiniteValue { sensor_id: String },
}

/// `lastMeasurement` object of a sensor.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementResponse {
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub value: f64,
}

/// Entry of the `sensors` array of a sense box.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub unit: Option<String>,
    #[serde(
        rename = "sensorType",
        default,
        deserialize_with = "deserialize_optional_string"
    )]
    pub sensor_type: Option<String>,
    #[serde(rename = "lastMeasurement", default)]
    pub last_measurement: Option<MeasurementResponse>,
}

/// Body of `GET /boxes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SenseBoxResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sensors: Vec<SensorResponse>,
}

/// Converts a sense box response into the domain type.
pub fn decode_sense_box(response: SenseBoxResponse) -> Result<SenseBox, DecodeError> {
    if response.id.trim().is_empty() {
        return Err(DecodeError::MissingId);
    }

    let sensors = response
        .sensors
        .into_iter()
        .map(decode_sensor)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SenseBox {
        id: response.id,
        name: response.name,
        sensors,
    })
}

/// Parses and decodes a raw `GET /boxes/{id}` body.
pub fn parse_sense_box(bytes: &[u8]) -> Result<SenseBox, DecodeError> {
    let response: SenseBoxResponse =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode_sense_box(response)
}

fn decode_sensor(response: SensorResponse) -> Result<Sensor, DecodeError> {
    let last_measurement = match response.last_measurement {
        Some(m) if !m.value.is_finite() => {
            return Err(DecodeError::NonFiniteValue {
                sensor_id: response.id,
            })
        }
        Some(m) => Some(Measurement::new(m.created_at, m.value)),
        None => None,
    };

    Ok(Sensor {
        id: response.id,
        title: response.title,
        unit: response.unit,
        sensor_type: response.sensor_type,
        last_measurement,
    })
}
