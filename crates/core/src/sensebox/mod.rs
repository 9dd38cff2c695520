//! The openSenseMap sense box domain.

mod types;
mod wire;

pub use types::{Measurement, SenseBox, Sensor, TEMPERATURE_TITLE_KEYWORD};
pub use wire::{
    decode_sense_box, parse_sense_box, DecodeError, MeasurementResponse, SenseBoxResponse,
    SensorResponse,
};
