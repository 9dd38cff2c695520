//! Cached repository decorator.
//!
//! Wraps a `Repository<T>` implementation with the cache-aside pattern.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::join_all;

use hive_core::cache::{
    collection_index_key, deserialize_entry, deserialize_index, entity_key, serialize_entry,
    serialize_index, should_refresh, AggregateIndex, Cache, CacheEntry, Cacheable,
};
use hive_core::storage::{CacheMetadata, Repository};

use super::single_flight::SingleFlight;

/// Expiry settings of a [`CachingRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age from which a cached entry is refreshed on read.
    pub refresh_after: TimeDelta,
    /// Store expiry of the aggregate index.
    pub index_ttl: Duration,
    /// Store expiry of each entity entry.
    pub entry_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            refresh_after: TimeDelta::minutes(5),
            index_ttl: Duration::from_secs(30 * 60),
            entry_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Cached repository decorator.
///
/// Implements the cache-aside pattern:
/// - **Fresh hit**: return the cached payload without touching the delegate
/// - **Miss or stale**: fetch from the delegate; on success write
///   `{cached_at: now, payload}` and return it, on failure return `None`
///   even when a stale payload was read
///
/// Refreshes of one key, and full loads of the collection, run once at a
/// time: concurrent callers join the running refresh and share its result.
///
/// Cache failures never fail a read: unreachable stores and undecodable
/// entries are misses, failed writes are logged and dropped.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
/// * `T` - The cached entity
pub struct CachingRepository<R, C, T>
where
    R: Repository<T>,
    C: Cache,
    T: Cacheable,
{
    repository: Arc<R>,
    cache: Arc<C>,
    policy: CachePolicy,
    entities: SingleFlight<Option<T>>,
    collections: SingleFlight<Vec<Option<T>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<R, C, T> CachingRepository<R, C, T>
where
    R: Repository<T>,
    C: Cache,
    T: Cacheable,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `policy` - Refresh window and store expiries
    pub fn new(repository: Arc<R>, cache: Arc<C>, policy: CachePolicy) -> Self {
        Self {
            repository,
            cache,
            policy,
            entities: SingleFlight::new(),
            collections: SingleFlight::new(),
            _entity: PhantomData,
        }
    }

    fn index_key(&self) -> String {
        collection_index_key(self.repository.collection())
    }

    /// Remaining store lifetime of the collection index.
    pub async fn index_time_to_live(&self) -> Option<Duration> {
        let key = self.index_key();
        match self.cache.time_to_live(&key).await {
            Ok(ttl) => ttl,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to read index TTL");
                None
            }
        }
    }

    async fn read_entry(&self, key: &str) -> Option<CacheEntry<T>> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed");
                return None;
            }
        };

        match deserialize_entry(&bytes) {
            Ok(entry) => Some(entry),
            Err(err) => {
                // Deserialization failed - treat as cache miss
                tracing::warn!(key = %key, error = %err, "Cache entry deserialization failed");
                None
            }
        }
    }

    async fn fresh_entry(&self, key: &str) -> Option<CacheEntry<T>> {
        self.read_entry(key)
            .await
            .filter(|entry| !should_refresh(entry.cached_at, Utc::now(), self.policy.refresh_after))
    }

    async fn write_entry(&self, key: &str, payload: &T) {
        let entry = CacheEntry::new(payload, Utc::now());
        let bytes = match serialize_entry(&entry) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(err) = self
            .cache
            .set(key, &bytes, Some(self.policy.entry_ttl))
            .await
        {
            tracing::warn!(key = %key, error = %err, "Failed to cache entity");
        }
    }

    async fn read_index(&self, key: &str) -> Option<AggregateIndex> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed");
                return None;
            }
        };

        match deserialize_index(&bytes) {
            Ok(index) => Some(index),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache index deserialization failed");
                None
            }
        }
    }

    async fn write_index(&self, key: &str, index: &AggregateIndex) {
        let bytes = match serialize_index(index) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to serialize cache index");
                return;
            }
        };

        match self
            .cache
            .set(key, &bytes, Some(self.policy.index_ttl))
            .await
        {
            Ok(()) => tracing::debug!(key = %key, members = index.ids.len(), "Cached index"),
            Err(err) => tracing::warn!(key = %key, error = %err, "Failed to cache index"),
        }
    }

    /// Fetches `id` from the delegate and caches the result on success.
    async fn refresh(&self, id: &str, key: &str) -> Option<T> {
        tracing::debug!(kind = T::KIND, id = %id, "Refreshing entity");

        let fresh = self.repository.find(id).await;
        match &fresh {
            Some(payload) => self.write_entry(key, payload).await,
            None => tracing::warn!(kind = T::KIND, id = %id, "Refresh failed"),
        }
        fresh
    }
}

#[async_trait]
impl<R, C, T> Repository<T> for CachingRepository<R, C, T>
where
    R: Repository<T> + 'static,
    C: Cache + 'static,
    T: Cacheable,
{
    fn collection(&self) -> &str {
        self.repository.collection()
    }

    fn ids(&self) -> Vec<String> {
        self.repository.ids()
    }

    async fn find(&self, id: &str) -> Option<T> {
        let key = entity_key(T::KIND, id);

        if let Some(entry) = self.fresh_entry(&key).await {
            tracing::trace!(kind = T::KIND, id = %id, "Cache hit");
            return Some(entry.payload);
        }

        let key = key.as_str();
        self.entities
            .run(key, move || async move {
                // A refresh that finished since the first read may have written it.
                if let Some(entry) = self.fresh_entry(key).await {
                    tracing::trace!(kind = T::KIND, id = %id, "Cache hit after refresh");
                    return Some(entry.payload);
                }

                tracing::trace!(kind = T::KIND, id = %id, "Cache miss");
                self.refresh(id, key).await
            })
            .await
    }

    async fn find_all(&self) -> Vec<Option<T>> {
        let key = self.index_key();

        if let Some(index) = self.read_index(&key).await {
            if tracing::enabled!(tracing::Level::TRACE) {
                let index_ttl = self.index_time_to_live().await;
                tracing::trace!(key = %key, index_ttl = ?index_ttl, "Index hit");
            }
            return join_all(index.ids.iter().map(|id| self.find(id))).await;
        }

        let key = key.as_str();
        self.collections
            .run(key, move || async move {
                if let Some(index) = self.read_index(key).await {
                    tracing::trace!(key = %key, "Index hit after load");
                    return join_all(index.ids.iter().map(|id| self.find(id))).await;
                }

                tracing::debug!(key = %key, collection = %self.collection(), "Index miss");
                let members = self.repository.find_all().await;

                for member in members.iter().flatten() {
                    self.write_entry(&entity_key(T::KIND, member.cache_id()), member)
                        .await;
                }
                self.write_index(key, &AggregateIndex::new(self.repository.ids()))
                    .await;

                members
            })
            .await
    }
}

#[async_trait]
impl<R, C, T> CacheMetadata for CachingRepository<R, C, T>
where
    R: Repository<T> + 'static,
    C: Cache + 'static,
    T: Cacheable,
{
    async fn last_modified(&self, id: &str) -> Option<DateTime<Utc>> {
        self.read_entry(&entity_key(T::KIND, id))
            .await
            .map(|entry| entry.cached_at)
    }

    async fn last_modified_all(&self) -> Vec<Option<DateTime<Utc>>> {
        let Some(index) = self.read_index(&self.index_key()).await else {
            return Vec::new();
        };

        join_all(index.ids.iter().map(|id| self.last_modified(id))).await
    }
}
