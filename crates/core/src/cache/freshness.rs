//! Pure freshness predicates.
//!
//! Staleness is always judged against the time an entry was written to the
//! cache, never against timestamps inside the cached entity.

use chrono::{DateTime, TimeDelta, Utc};

/// Returns true if an entry written at `cached_at` must be refetched.
///
/// The boundary is inclusive: an entry exactly `refresh_after` old is stale.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use hive_core::cache::should_refresh;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 17, 20, 0, 0).unwrap();
/// let refresh_after = TimeDelta::minutes(5);
///
/// assert!(should_refresh(now - refresh_after, now, refresh_after));
/// assert!(!should_refresh(now - TimeDelta::minutes(4), now, refresh_after));
/// ```
pub fn should_refresh(
    cached_at: DateTime<Utc>,
    now: DateTime<Utc>,
    refresh_after: TimeDelta,
) -> bool {
    now - cached_at >= refresh_after
}

/// Returns true if `timestamp` is absent or strictly older than `age`.
pub fn is_older_than(
    timestamp: Option<DateTime<Utc>>,
    age: TimeDelta,
    now: DateTime<Utc>,
) -> bool {
    match timestamp {
        Some(ts) => ts + age < now,
        None => true,
    }
}
