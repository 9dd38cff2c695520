//! Pure availability verdict: live quorum first, cached grace period second.

use chrono::{DateTime, TimeDelta, Utc};

use crate::cache::is_older_than;

/// How recent a cache write must be to keep the service available while
/// the live quorum is lost.
pub const GRACE_PERIOD: TimeDelta = TimeDelta::minutes(5);

/// Number of failed members that loses the live quorum: `n / 2 + 1`.
pub fn failure_threshold(members: usize) -> usize {
    members / 2 + 1
}

/// Returns true while fewer than [`failure_threshold`] members failed.
///
/// An empty collection holds quorum.
pub fn has_quorum(members: usize, failed: usize) -> bool {
    failed < failure_threshold(members)
}

/// Returns true if at least one cached timestamp is within `grace`.
///
/// Missing timestamps count as too old; an empty list has nothing fresh.
pub fn has_recent_cache(
    last_modified: &[Option<DateTime<Utc>>],
    grace: TimeDelta,
    now: DateTime<Utc>,
) -> bool {
    !last_modified
        .iter()
        .all(|timestamp| is_older_than(*timestamp, grace, now))
}
