//! Bounded in-memory caches built on moka.
//!
//! Neither cache is authoritative: an evicted entry only costs a repeated
//! run or a missing audit record in the operator view.

use std::sync::Arc;
use std::time::Duration;

use equiv_core::config::WorkerConfig;
use equiv_core::models::StoredEquivalenceResult;
use equiv_core::traits::IResultStore;
use equiv_core::EquivResult;
use moka::sync::Cache;

/// Subject ids processed within the last TTL window.
pub struct RecentlyProcessed {
    cache: Cache<u64, ()>,
}

impl RecentlyProcessed {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn from_config(config: &WorkerConfig) -> Self {
        Self::new(
            config.recently_processed_capacity,
            Duration::from_secs(config.recently_processed_ttl_secs),
        )
    }

    /// Mark `id` as processed. Returns false when it already was.
    pub fn mark(&self, id: u64) -> bool {
        self.cache.entry(id).or_insert(()).is_fresh()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.cache.contains_key(&id)
    }

    /// Forget `id`, so the next notification for it runs.
    pub fn forget(&self, id: u64) {
        self.cache.invalidate(&id);
    }
}

/// Latest audit record per subject uri.
///
/// Writes are forwarded to an optional persistent store; reads are served
/// from memory first.
pub struct RecentResultStore {
    cache: Cache<String, StoredEquivalenceResult>,
    delegate: Option<Arc<dyn IResultStore>>,
}

impl RecentResultStore {
    pub fn new(capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(Duration::from_secs(24 * 3_600))
            .build();
        Self {
            cache,
            delegate: None,
        }
    }

    pub fn backed_by(mut self, delegate: Arc<dyn IResultStore>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn latest(&self, uri: &str) -> Option<StoredEquivalenceResult> {
        self.cache.get(uri)
    }

    /// Number of cached records.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IResultStore for RecentResultStore {
    fn store(&self, result: StoredEquivalenceResult) -> EquivResult<()> {
        if let Some(delegate) = &self.delegate {
            delegate.store(result.clone())?;
        }
        self.cache.insert(result.subject_uri.clone(), result);
        Ok(())
    }

    fn for_uri(&self, uri: &str) -> EquivResult<Option<StoredEquivalenceResult>> {
        if let Some(hit) = self.cache.get(uri) {
            return Ok(Some(hit));
        }
        match &self.delegate {
            Some(delegate) => delegate.for_uri(uri),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;

    fn record(uri: &str) -> StoredEquivalenceResult {
        StoredEquivalenceResult {
            subject_uri: uri.to_string(),
            subject_id: None,
            title: None,
            publisher: "pa".into(),
            source_scores: BTreeMap::new(),
            combined: BTreeMap::new(),
            accepted: BTreeMap::new(),
            description: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn second_mark_reports_a_repeat() {
        let recent = RecentlyProcessed::new(10, Duration::from_secs(60));
        assert!(recent.mark(1));
        assert!(!recent.mark(1));
        assert!(recent.contains(1));
        recent.forget(1);
        assert!(recent.mark(1));
    }

    #[test]
    fn results_are_kept_per_uri_and_forwarded() {
        let backing = Arc::new(RecentResultStore::new(10));
        let store = RecentResultStore::new(10).backed_by(backing.clone());
        store.store(record("a")).unwrap();
        assert_eq!(store.latest("a").map(|r| r.subject_uri), Some("a".into()));
        assert!(backing.for_uri("a").unwrap().is_some());
        assert!(store.for_uri("b").unwrap().is_none());
    }
}
