use serde::{de::DeserializeOwned, Serialize};

/// An entity that can be stored in the entity cache.
///
/// Implemented once per entity kind; the caching decorator is generic over
/// it, so each kind gets its own key namespace and codec.
pub trait Cacheable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key namespace for this kind. Must not contain `:`.
    const KIND: &'static str;

    /// Stable identifier of this entity.
    fn cache_id(&self) -> &str;
}
