//! Application state shared by all request handlers.

use std::sync::Arc;

use hive_core::cache::Cache;
use hive_core::sensebox::SenseBox;

use crate::config::Config;
use crate::services::{AvailabilityService, TemperatureService};
use crate::storage::cached::CachingRepository;
use crate::storage::opensensemap::SenseBoxRepository;

/// Shared application state.
///
/// Cloned for each request handler; services are built once in `main`.
#[derive(Clone)]
pub struct AppState {
    /// Temperature aggregation over the cached repository.
    pub temperature: Arc<TemperatureService>,
    /// Readiness verdict over the live repository and cache metadata.
    pub availability: Arc<AvailabilityService>,
}

impl AppState {
    pub fn new(temperature: Arc<TemperatureService>, availability: Arc<AvailabilityService>) -> Self {
        Self {
            temperature,
            availability,
        }
    }

    /// Wires the services around one upstream repository and one cache.
    ///
    /// Temperature reads go through the cache; readiness checks query the
    /// upstream directly and consult the cache only for write times.
    pub fn build<C>(upstream: Arc<SenseBoxRepository>, cache: Arc<C>, config: &Config) -> Self
    where
        C: Cache + 'static,
    {
        let cached: Arc<CachingRepository<SenseBoxRepository, C, SenseBox>> = Arc::new(
            CachingRepository::new(upstream.clone(), cache, config.cache_policy()),
        );

        let temperature = TemperatureService::new(cached.clone());
        let availability =
            AvailabilityService::new(upstream, cached, config.availability_grace());

        Self::new(Arc::new(temperature), Arc::new(availability))
    }
}
