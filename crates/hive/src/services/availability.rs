//! Readiness verdict under the quorum-plus-grace-period policy.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use hive_core::availability::{failure_threshold, has_quorum, has_recent_cache};
use hive_core::sensebox::SenseBox;
use hive_core::storage::{CacheMetadata, Repository};

/// Decides whether the service can still answer meaningfully.
///
/// Live upstream health comes first: fewer than `n / 2 + 1` failed members
/// keeps the service available. Past that, a cache entry written within the
/// grace period still does.
pub struct AvailabilityService {
    repository: Arc<dyn Repository<SenseBox>>,
    metadata: Arc<dyn CacheMetadata>,
    grace_period: TimeDelta,
}

impl AvailabilityService {
    /// Creates a new availability service.
    ///
    /// # Arguments
    ///
    /// * `repository` - Uncached repository, queried live on every check
    /// * `metadata` - Write times of the cached collection
    /// * `grace_period` - How recent a cache write keeps the service available
    pub fn new(
        repository: Arc<dyn Repository<SenseBox>>,
        metadata: Arc<dyn CacheMetadata>,
        grace_period: TimeDelta,
    ) -> Self {
        Self {
            repository,
            metadata,
            grace_period,
        }
    }

    pub async fn is_available(&self) -> bool {
        let members = self.repository.find_all().await;
        let failed = members.iter().filter(|member| member.is_none()).count();

        if has_quorum(members.len(), failed) {
            return true;
        }

        let last_modified = self.metadata.last_modified_all().await;
        let available = has_recent_cache(&last_modified, self.grace_period, Utc::now());

        tracing::warn!(
            members = members.len(),
            failed,
            threshold = failure_threshold(members.len()),
            cached = last_modified.iter().flatten().count(),
            available,
            "Upstream quorum lost"
        );

        available
    }
}
