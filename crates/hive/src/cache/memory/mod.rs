//! In-memory cache backend implementation.
//!
//! Provides a thread-safe in-memory cache with TTL support for
//! single-instance deployments and local development.

mod cache;

pub use cache::MemoryCache;
