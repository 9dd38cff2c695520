//! Pure functions for serializing/deserializing cache values to/from bytes.
//!
//! These functions use JSON serialization for cache storage, providing human-readable
//! cache values that are easy to debug and inspect with `redis-cli`.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// A cached entity together with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// When the entry was written to the cache.
    pub cached_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stamped with the given write time.
    pub fn new(payload: T, cached_at: DateTime<Utc>) -> Self {
        Self { cached_at, payload }
    }
}

/// Ordered member ids of a previously fetched collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateIndex {
    pub ids: Vec<String>,
}

impl AggregateIndex {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

/// Serializes a cache entry to JSON bytes.
pub fn serialize_entry<T: Serialize>(entry: &CacheEntry<T>) -> Result<Vec<u8>> {
    serde_json::to_vec(entry).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a cache entry.
pub fn deserialize_entry<T: DeserializeOwned>(bytes: &[u8]) -> Result<CacheEntry<T>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes an aggregate index to JSON bytes.
pub fn serialize_index(index: &AggregateIndex) -> Result<Vec<u8>> {
    serde_json::to_vec(index).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to an aggregate index.
pub fn deserialize_index(bytes: &[u8]) -> Result<AggregateIndex> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
