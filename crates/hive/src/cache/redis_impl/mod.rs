//! Redis cache backend implementation.
//!
//! Provides the shared cache every hive instance reads and writes, so a
//! refresh performed by one instance is visible to all of them.

mod cache;
mod error;

pub use cache::RedisCache;
