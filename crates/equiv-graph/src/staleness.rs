//! Tracks components whose closure recomputation was deferred.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use equiv_core::config::GraphConfig;

/// A deferred component awaiting recomputation.
#[derive(Debug, Clone)]
pub struct PendingClosure {
    pub members: BTreeSet<String>,
    pub writes: u32,
    pub since: DateTime<Utc>,
}

/// Stale components keyed by their smallest member uri.
///
/// A component becomes due once it has absorbed enough writes or has been
/// waiting long enough, whichever comes first.
pub struct StaleClosureTracker {
    pending: DashMap<String, PendingClosure>,
    after_writes: u32,
    after: Duration,
}

impl StaleClosureTracker {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            pending: DashMap::new(),
            after_writes: config.recompute_after_writes,
            after: Duration::seconds(i64::try_from(config.recompute_after_secs).unwrap_or(i64::MAX)),
        }
    }

    /// Record a write that left `members` stale.
    pub fn mark(&self, members: BTreeSet<String>, now: DateTime<Utc>) {
        let Some(key) = members.iter().next().cloned() else {
            return;
        };
        self.pending
            .entry(key)
            .and_modify(|p| {
                p.writes += 1;
                p.members.extend(members.iter().cloned());
            })
            .or_insert_with(|| PendingClosure {
                members,
                writes: 1,
                since: now,
            });
    }

    /// Components due for recomputation at `now`.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<(String, PendingClosure)> {
        let mut due: Vec<(String, PendingClosure)> = self
            .pending
            .iter()
            .filter(|p| p.writes >= self.after_writes || now - p.since >= self.after)
            .map(|p| (p.key().clone(), p.value().clone()))
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0));
        due
    }

    pub fn clear(&self, key: &str) {
        self.pending.remove(key);
    }

    pub fn is_pending(&self, uri: &str) -> bool {
        self.pending.iter().any(|p| p.members.contains(uri))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(uris: &[&str]) -> BTreeSet<String> {
        uris.iter().map(|u| u.to_string()).collect()
    }

    fn tracker(writes: u32, secs: u64) -> StaleClosureTracker {
        StaleClosureTracker::new(&GraphConfig {
            max_transitive_set_size: 2,
            recompute_after_writes: writes,
            recompute_after_secs: secs,
        })
    }

    #[test]
    fn due_after_enough_writes() {
        let tracker = tracker(2, 3_600);
        let now = Utc::now();
        tracker.mark(members(&["a", "b", "c"]), now);
        assert!(tracker.due(now).is_empty());
        tracker.mark(members(&["a", "b", "c"]), now);
        assert_eq!(tracker.due(now).len(), 1);
        assert!(tracker.is_pending("b"));
    }

    #[test]
    fn due_after_waiting() {
        let tracker = tracker(100, 60);
        let now = Utc::now();
        tracker.mark(members(&["a", "b", "c"]), now);
        assert!(tracker.due(now + Duration::seconds(59)).is_empty());
        assert_eq!(tracker.due(now + Duration::seconds(60)).len(), 1);
        tracker.clear("a");
        assert!(tracker.is_empty());
    }
}
