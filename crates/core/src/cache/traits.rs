use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for the shared key-value store backing the entity cache.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Returns the remaining time to live of a key.
    ///
    /// `None` when the key does not exist or has no expiry.
    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>>;
}
