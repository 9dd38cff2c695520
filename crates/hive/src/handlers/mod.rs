pub mod health;
pub mod temperature;
pub mod version;
