use std::{env, time::Duration};

use chrono::TimeDelta;

use crate::storage::cached::CachePolicy;

/// Sense boxes polled when `SENSE_BOX_IDS` is unset.
pub const DEFAULT_SENSE_BOX_IDS: [&str; 3] = [
    "62221953b527de001b58de79",
    "61ed83f8f4d1e2001c350c77",
    "61e6c8ffac538c001b9f4bf0",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sense boxes to aggregate, in order (default: three Herzogenrath/Kerkrade boxes)
    pub sense_box_ids: Vec<String>,
    /// openSenseMap API base URL (default: "https://api.opensensemap.org")
    pub opensensemap_base_url: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Age in seconds from which cached boxes are refreshed (default: 300)
    pub cache_refresh_after_seconds: u64,
    /// Store TTL of the collection index in seconds (default: 1,800)
    pub cache_index_ttl_seconds: u64,
    /// Store TTL of each cached box in seconds (default: 86,400)
    pub cache_entry_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Timeout of each upstream request in seconds (default: 30)
    pub upstream_timeout_seconds: u64,
    /// How recent a cache write keeps the service ready in seconds (default: 300)
    pub availability_grace_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SENSE_BOX_IDS` - Comma-separated sense box ids
    /// - `OPENSENSEMAP_BASE_URL` - openSenseMap API base URL
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_REFRESH_AFTER_SECONDS` - Refresh window (default: 300)
    /// - `CACHE_INDEX_TTL_SECONDS` - Index TTL (default: 1,800)
    /// - `CACHE_ENTRY_TTL_SECONDS` - Entry TTL (default: 86,400)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `UPSTREAM_TIMEOUT_SECONDS` - Upstream request timeout (default: 30)
    /// - `AVAILABILITY_GRACE_SECONDS` - Readiness grace period (default: 300)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            sense_box_ids: lookup("SENSE_BOX_IDS")
                .map(|v| parse_ids(&v))
                .filter(|ids| !ids.is_empty())
                .unwrap_or_else(|| DEFAULT_SENSE_BOX_IDS.map(String::from).to_vec()),
            opensensemap_base_url: lookup("OPENSENSEMAP_BASE_URL")
                .unwrap_or_else(|| "https://api.opensensemap.org".to_string()),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_refresh_after_seconds: number("CACHE_REFRESH_AFTER_SECONDS", 300),
            cache_index_ttl_seconds: number("CACHE_INDEX_TTL_SECONDS", 1_800),
            cache_entry_ttl_seconds: number("CACHE_ENTRY_TTL_SECONDS", 86_400),
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10_000),
            upstream_timeout_seconds: number("UPSTREAM_TIMEOUT_SECONDS", 30),
            availability_grace_seconds: number("AVAILABILITY_GRACE_SECONDS", 300),
        }
    }

    /// Expiry settings for the caching repository.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            refresh_after: seconds(self.cache_refresh_after_seconds),
            index_ttl: Duration::from_secs(self.cache_index_ttl_seconds),
            entry_ttl: Duration::from_secs(self.cache_entry_ttl_seconds),
        }
    }

    /// Get upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Get the readiness grace period.
    pub fn availability_grace(&self) -> TimeDelta {
        seconds(self.availability_grace_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

fn seconds(value: u64) -> TimeDelta {
    i64::try_from(value)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}
