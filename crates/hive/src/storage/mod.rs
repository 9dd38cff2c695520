//! Repository implementations.
//!
//! - `opensensemap`: live repository fetching sense boxes over HTTP
//! - `cached`: cache-aside decorator over any repository, backed by the
//!   cache selected through the `memory` / `redis` features
//!
//! ```text
//! TemperatureService ──> CachingRepository ──> SenseBoxRepository ──> openSenseMap
//!                               │                      ^
//!                               v                      │
//!                             Cache     AvailabilityService (live + cache write times)
//! ```

pub mod cached;
pub mod opensensemap;
