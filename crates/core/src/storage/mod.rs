mod traits;

pub use traits::{CacheMetadata, Repository};
