use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Cacheable;

/// Case-insensitive title fragment identifying temperature sensors.
///
/// Matches "Temperatur", "Temperature" and "Lufttemperatur".
pub const TEMPERATURE_TITLE_KEYWORD: &str = "temperatur";

/// A single reading emitted by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

impl Measurement {
    pub fn new(created_at: DateTime<Utc>, value: f64) -> Self {
        Self { created_at, value }
    }
}

/// A sensor mounted on a sense box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub sensor_type: Option<String>,
    /// Latest reading, if the sensor ever reported one.
    pub last_measurement: Option<Measurement>,
}

impl Sensor {
    /// Creates a sensor without unit, type or measurement.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            unit: None,
            sensor_type: None,
            last_measurement: None,
        }
    }

    /// Sets the latest measurement for this sensor.
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.last_measurement = Some(measurement);
        self
    }

    /// Sets the unit for this sensor.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Returns true if the title names a temperature sensor.
    pub fn is_temperature(&self) -> bool {
        self.title
            .to_lowercase()
            .contains(TEMPERATURE_TITLE_KEYWORD)
    }
}

/// An identifiable, named station carrying several sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseBox {
    pub id: String,
    pub name: String,
    pub sensors: Vec<Sensor>,
}

impl SenseBox {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sensors: Vec::new(),
        }
    }

    /// Adds a sensor to this box.
    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// Returns the most recent temperature reading of this box.
    ///
    /// Sensors titled as temperature sensors are preferred; a box without
    /// any falls back to all of its sensors.
    pub fn latest_temperature(&self) -> Option<Measurement> {
        let has_temperature_sensor = self.sensors.iter().any(Sensor::is_temperature);

        self.sensors
            .iter()
            .filter(|sensor| !has_temperature_sensor || sensor.is_temperature())
            .filter_map(|sensor| sensor.last_measurement)
            .max_by_key(|measurement| measurement.created_at)
    }
}

impl Cacheable for SenseBox {
    const KIND: &'static str = "sensebox";

    fn cache_id(&self) -> &str {
        &self.id
    }
}
