//! Cache key scheme.
//!
//! One key per entity (`entity:{kind}:{id}`) and one key per named
//! collection index (`index:{collection}`). The two prefixes never overlap,
//! and entity kinds never contain `:`, so different kinds or collections
//! cannot collide.

/// Returns the cache key for a single entity of the given kind.
pub fn entity_key(kind: &str, id: &str) -> String {
    format!("entity:{}:{}", kind, id)
}

/// Returns the cache key for the aggregate id index of a collection.
pub fn collection_index_key(collection: &str) -> String {
    format!("index:{}", collection)
}
