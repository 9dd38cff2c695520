//! Application services composed from repositories.

mod availability;
mod temperature;

pub use availability::AvailabilityService;
pub use temperature::TemperatureService;
