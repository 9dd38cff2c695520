//! hive_core - functional core of the hive service.
//!
//! Everything in this crate is free of I/O: cache keys and codecs, freshness
//! predicates, repository traits, the sense box domain and the temperature
//! and availability rules. The `hive` binary wires these to Redis, the
//! openSenseMap API and axum.

pub mod availability;
pub mod cache;
pub mod sensebox;
pub mod serde;
pub mod storage;
pub mod temperature;
