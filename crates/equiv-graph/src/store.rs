//! In-memory lookup entry store backed by `DashMap`.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use equiv_core::content::Alias;
use equiv_core::errors::StoreError;
use equiv_core::traits::ILookupEntryStore;
use equiv_core::{Content, EquivResult, LookupEntry};

/// Thread-safe entry storage keyed by uri, with an id index.
#[derive(Default)]
pub struct InMemoryLookupEntryStore {
    entries: Arc<DashMap<String, LookupEntry>>,
    ids: Arc<DashMap<u64, String>>,
    unavailable: AtomicBool,
}

impl InMemoryLookupEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one entry.
    pub fn get(&self, uri: &str) -> Option<LookupEntry> {
        self.entries.get(uri).map(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in uri order.
    pub fn all(&self) -> Vec<LookupEntry> {
        let mut all: Vec<LookupEntry> = self.entries.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.uri.cmp(&b.uri));
        all
    }

    /// Make every call fail, as a stand-in for an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> EquivResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                collaborator: "lookup store".into(),
                reason: "marked unavailable".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl ILookupEntryStore for InMemoryLookupEntryStore {
    fn entries_for_uris(&self, uris: &[String]) -> EquivResult<Vec<LookupEntry>> {
        self.check()?;
        Ok(uris
            .iter()
            .filter_map(|uri| self.entries.get(uri).map(|e| e.clone()))
            .collect())
    }

    fn entries_for_ids(&self, ids: &[u64]) -> EquivResult<Vec<LookupEntry>> {
        self.check()?;
        let uris: Vec<String> = ids
            .iter()
            .filter_map(|id| self.ids.get(id).map(|u| u.clone()))
            .collect();
        self.entries_for_uris(&uris)
    }

    fn entries_for_aliases(&self, aliases: &[Alias]) -> EquivResult<Vec<LookupEntry>> {
        self.check()?;
        let wanted: BTreeSet<&Alias> = aliases.iter().collect();
        let mut found: Vec<LookupEntry> = self
            .entries
            .iter()
            .filter(|e| e.aliases.iter().any(|a| wanted.contains(a)))
            .map(|e| e.value().clone())
            .collect();
        found.sort_by(|a, b| a.uri.cmp(&b.uri));
        Ok(found)
    }

    fn store(&self, entry: LookupEntry) -> EquivResult<()> {
        self.check()?;
        if let Some(id) = entry.id {
            self.ids.insert(id, entry.uri.clone());
        }
        self.entries.insert(entry.uri.clone(), entry);
        Ok(())
    }

    fn ensure_lookup(&self, content: &Content) -> EquivResult<LookupEntry> {
        self.check()?;
        let entry = self
            .entries
            .entry(content.canonical_uri.clone())
            .or_insert_with(|| LookupEntry::for_content(content, Utc::now()))
            .clone();
        if let Some(id) = entry.id {
            self.ids.insert(id, entry.uri.clone());
        }
        Ok(entry)
    }

    fn entries_after(&self, after_id: u64, limit: usize) -> EquivResult<Vec<LookupEntry>> {
        self.check()?;
        let mut ids: Vec<u64> = self
            .ids
            .iter()
            .map(|e| *e.key())
            .filter(|id| *id > after_id)
            .collect();
        ids.sort_unstable();
        ids.truncate(limit);
        self.entries_for_ids(&ids)
    }
}
