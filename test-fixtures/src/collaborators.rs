use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use equiv_core::errors::{EquivResult, StoreError};
use equiv_core::models::{EquivalenceAssertionMessage, EquivalenceSummary};
use equiv_core::traits::{
    IContentLister, IContentResolver, IEquivalenceSummaryStore, IMessageSender, IProgressStore,
    IScheduleResolver, ISearchResolver, SearchQuery,
};
use equiv_core::{Content, Publisher};

/// Content storage, title search, and schedules over one in-memory catalogue.
#[derive(Default)]
pub struct InMemoryContentStore {
    by_uri: RwLock<BTreeMap<String, Arc<Content>>>,
    unavailable: AtomicBool,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(content: impl IntoIterator<Item = Content>) -> Self {
        let store = Self::new();
        for c in content {
            store.insert(c);
        }
        store
    }

    pub fn insert(&self, content: Content) -> Arc<Content> {
        let content = Arc::new(content);
        self.by_uri
            .write()
            .unwrap()
            .insert(content.canonical_uri.clone(), content.clone());
        content
    }

    pub fn get(&self, uri: &str) -> Option<Arc<Content>> {
        self.by_uri.read().unwrap().get(uri).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_uri.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every lookup fail, as if the backing store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> EquivResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                collaborator: "content store".into(),
                reason: "offline".into(),
            }
            .into());
        }
        Ok(())
    }

    fn all(&self) -> Vec<Arc<Content>> {
        self.by_uri.read().unwrap().values().cloned().collect()
    }
}

impl IContentResolver for InMemoryContentStore {
    fn resolve_uris(&self, uris: &[String]) -> EquivResult<Vec<Arc<Content>>> {
        self.check()?;
        let map = self.by_uri.read().unwrap();
        Ok(uris.iter().filter_map(|u| map.get(u).cloned()).collect())
    }

    fn resolve_ids(&self, ids: &[u64]) -> EquivResult<Vec<Arc<Content>>> {
        self.check()?;
        let all = self.all();
        Ok(ids
            .iter()
            .filter_map(|id| all.iter().find(|c| c.id == Some(*id)).cloned())
            .collect())
    }
}

impl IContentLister for InMemoryContentStore {
    fn list(
        &self,
        publishers: &[Publisher],
        after_id: u64,
        limit: usize,
    ) -> EquivResult<Vec<Arc<Content>>> {
        self.check()?;
        let mut matching: Vec<Arc<Content>> = self
            .all()
            .into_iter()
            .filter(|c| publishers.contains(&c.publisher))
            .filter(|c| c.id.is_some_and(|id| id > after_id))
            .collect();
        matching.sort_by_key(|c| c.id);
        matching.truncate(limit);
        Ok(matching)
    }
}

impl ISearchResolver for InMemoryContentStore {
    fn search(&self, query: &SearchQuery) -> EquivResult<Vec<Arc<Content>>> {
        self.check()?;
        let needle = query.title.to_lowercase();
        let first_word = needle.split_whitespace().next().unwrap_or("").to_string();
        let mut hits: Vec<Arc<Content>> = self
            .all()
            .into_iter()
            .filter(|c| query.publishers.contains(&c.publisher))
            .filter(|c| query.shapes.is_empty() || query.shapes.contains(&c.shape))
            .filter(|c| {
                c.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&first_word))
            })
            .collect();
        hits.truncate(query.limit);
        Ok(hits)
    }
}

impl IScheduleResolver for InMemoryContentStore {
    fn schedule(
        &self,
        channel: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        publishers: &[Publisher],
    ) -> EquivResult<Vec<Arc<Content>>> {
        self.check()?;
        Ok(self
            .all()
            .into_iter()
            .filter(|c| publishers.contains(&c.publisher))
            .filter(|c| {
                c.broadcasts.iter().any(|b| {
                    b.channel == channel && b.transmission_start < to && b.transmission_end > from
                })
            })
            .collect())
    }
}

/// Summaries keyed by subject uri.
#[derive(Default)]
pub struct InMemorySummaryStore {
    summaries: RwLock<HashMap<String, EquivalenceSummary>>,
}

impl InMemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &str) -> Option<EquivalenceSummary> {
        self.summaries.read().unwrap().get(uri).cloned()
    }
}

impl IEquivalenceSummaryStore for InMemorySummaryStore {
    fn summaries_for(&self, uris: &[String]) -> EquivResult<BTreeMap<String, EquivalenceSummary>> {
        let map = self.summaries.read().unwrap();
        Ok(uris
            .iter()
            .filter_map(|u| map.get(u).map(|s| (u.clone(), s.clone())))
            .collect())
    }

    fn store(&self, summary: EquivalenceSummary) -> EquivResult<()> {
        self.summaries
            .write()
            .unwrap()
            .insert(summary.subject.clone(), summary);
        Ok(())
    }
}

/// Captures sent messages; can be told to fail.
#[derive(Default)]
pub struct RecordingMessageSender {
    sent: Mutex<Vec<EquivalenceAssertionMessage>>,
    failing: AtomicBool,
}

impl RecordingMessageSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sender = Self::default();
        sender.failing.store(true, Ordering::SeqCst);
        sender
    }

    pub fn sent(&self) -> Vec<EquivalenceAssertionMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl IMessageSender for RecordingMessageSender {
    fn send(&self, message: &EquivalenceAssertionMessage) -> EquivResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                collaborator: "message queue".into(),
                reason: "broker down".into(),
            }
            .into());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Cursor store; remembers every save for assertions.
#[derive(Default)]
pub struct InMemoryProgressStore {
    cursors: Mutex<HashMap<String, u64>>,
    saves: Mutex<Vec<(String, u64)>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> Vec<(String, u64)> {
        self.saves.lock().unwrap().clone()
    }
}

impl IProgressStore for InMemoryProgressStore {
    fn load(&self, task: &str) -> EquivResult<u64> {
        Ok(self.cursors.lock().unwrap().get(task).copied().unwrap_or(0))
    }

    fn save(&self, task: &str, cursor: u64) -> EquivResult<()> {
        self.cursors.lock().unwrap().insert(task.to_string(), cursor);
        self.saves.lock().unwrap().push((task.to_string(), cursor));
        Ok(())
    }
}
