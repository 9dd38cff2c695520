use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only repository over a configured collection of entities.
///
/// Failures never cross this boundary as errors: an entity that could not
/// be produced is `None`, and callers decide what a missing member means.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Name of the collection, used to namespace its aggregate index.
    fn collection(&self) -> &str;

    /// Ids of the collection members, in their configured order.
    fn ids(&self) -> Vec<String>;

    /// Gets an entity by its ID.
    async fn find(&self, id: &str) -> Option<T>;

    /// Gets every member of the collection, one slot per id in `ids()` order.
    async fn find_all(&self) -> Vec<Option<T>>;
}

/// Write-time metadata kept by a caching repository.
#[async_trait]
pub trait CacheMetadata: Send + Sync {
    /// When the entity was last written to the cache. Never fetches.
    async fn last_modified(&self, id: &str) -> Option<DateTime<Utc>>;

    /// `last_modified` for every id of the cached collection index.
    ///
    /// Empty when no index is cached.
    async fn last_modified_all(&self) -> Vec<Option<DateTime<Utc>>>;
}
