//! Cache-aside repository decorator.
//!
//! [`CachingRepository`] wraps any `Repository<T>` with a shared `Cache`:
//!
//! - **Reads**: serve the cached entry while it is younger than the refresh
//!   window, otherwise refresh from the delegate and write the result back
//! - **Collections**: remember the member ids under an aggregate index so
//!   later reads resolve members one by one
//! - **Refreshes**: one in flight per key, later callers share its outcome
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let upstream = Arc::new(SenseBoxRepository::new(client, ids));
//! let cache = Arc::new(MemoryCache::new(10_000)?);
//!
//! let cached = CachingRepository::new(upstream, cache, CachePolicy::default());
//! ```

mod repository;
mod single_flight;

pub use repository::{CachePolicy, CachingRepository};
