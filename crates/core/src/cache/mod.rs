mod cacheable;
mod error;
mod freshness;
mod keys;
mod serialization;
mod traits;

pub use cacheable::Cacheable;
pub use error::{CacheError, Result};
pub use freshness::{is_older_than, should_refresh};
pub use keys::{collection_index_key, entity_key};
pub use serialization::{
    deserialize_entry, deserialize_index, serialize_entry, serialize_index, AggregateIndex,
    CacheEntry, SerializationError,
};
pub use traits::Cache;
