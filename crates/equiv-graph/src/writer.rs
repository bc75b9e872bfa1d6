//! Writes accepted sets into the graph and keeps closures current.
//!
//! All graph mutations go through one write lock. A write loads every
//! component it can touch, edits edges in memory, recomputes closures, and
//! stores only the entries that changed.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use equiv_core::config::GraphConfig;
use equiv_core::errors::GraphError;
use equiv_core::traits::{ILookupEntryStore, ILookupWriter};
use equiv_core::{Direction, EquivRefs, EquivResult, LookupEntry, LookupRef, Publisher};
use tracing::{debug, info, warn};

use crate::component::{load_component, recompute_closures};
use crate::staleness::StaleClosureTracker;

/// Which edge set a writer maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Automatically computed edges.
    Direct,
    /// Curated edges.
    Explicit,
}

impl WriteMode {
    fn edges(self, entry: &LookupEntry) -> &EquivRefs {
        match self {
            WriteMode::Direct => &entry.direct,
            WriteMode::Explicit => &entry.explicit,
        }
    }

    pub(crate) fn edges_mut(self, entry: &mut LookupEntry) -> &mut EquivRefs {
        match self {
            WriteMode::Direct => &mut entry.direct,
            WriteMode::Explicit => &mut entry.explicit,
        }
    }
}

pub struct TransitiveLookupWriter {
    store: Arc<dyn ILookupEntryStore>,
    mode: WriteMode,
    max_set_size: usize,
    stale: Arc<StaleClosureTracker>,
    write_lock: Arc<Mutex<()>>,
}

impl TransitiveLookupWriter {
    pub fn new(store: Arc<dyn ILookupEntryStore>, config: &GraphConfig) -> Self {
        Self {
            store,
            mode: WriteMode::Direct,
            max_set_size: config.max_transitive_set_size,
            stale: Arc::new(StaleClosureTracker::new(config)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A writer for the curated set sharing this writer's lock and tracker.
    pub fn explicit(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mode: WriteMode::Explicit,
            max_set_size: self.max_set_size,
            stale: Arc::clone(&self.stale),
            write_lock: Arc::clone(&self.write_lock),
        }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn stale_closures(&self) -> &StaleClosureTracker {
        &self.stale
    }

    pub(crate) fn store(&self) -> &Arc<dyn ILookupEntryStore> {
        &self.store
    }

    pub(crate) fn lock(&self, subject: &str) -> EquivResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| {
            GraphError::WriteRejected {
                subject: subject.to_string(),
                reason: format!("write lock poisoned: {e}"),
            }
            .into()
        })
    }

    /// Recompute closures, persist every entry that changed, and return them.
    ///
    /// `edited` names entries whose edges were modified in memory.
    pub(crate) fn commit(
        &self,
        mut entries: BTreeMap<String, LookupEntry>,
        edited: BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> EquivResult<Vec<LookupEntry>> {
        let closures = recompute_closures(&mut entries, Some(self.max_set_size), now);
        for component in closures.deferred {
            warn!(
                size = component.len(),
                limit = self.max_set_size,
                "closure recomputation deferred"
            );
            self.stale.mark(component, now);
        }

        let mut changed = Vec::new();
        for uri in edited.union(&closures.changed) {
            if let Some(mut entry) = entries.remove(uri) {
                entry.updated = now;
                self.store.store(entry.clone())?;
                changed.push(entry);
            }
        }
        Ok(changed)
    }

    /// Recompute closures for deferred components that are due.
    ///
    /// Returns the number of entries rewritten.
    pub fn refresh_stale(&self, now: DateTime<Utc>) -> EquivResult<usize> {
        let due = self.stale.due(now);
        if due.is_empty() {
            return Ok(0);
        }
        let _guard = self.lock("stale closures")?;
        let mut rewritten = 0;
        for (key, pending) in due {
            let mut entries = load_component(self.store.as_ref(), pending.members)?;
            let closures = recompute_closures(&mut entries, None, now);
            for uri in &closures.changed {
                if let Some(entry) = entries.remove(uri) {
                    self.store.store(entry)?;
                    rewritten += 1;
                }
            }
            self.stale.clear(&key);
        }
        info!(rewritten, "stale closures refreshed");
        Ok(rewritten)
    }
}

impl ILookupWriter for TransitiveLookupWriter {
    fn write_lookup(
        &self,
        subject: &LookupRef,
        equivalents: &[LookupRef],
        publishers: &BTreeSet<Publisher>,
    ) -> EquivResult<Option<Vec<LookupEntry>>> {
        let _guard = self.lock(&subject.uri)?;
        let mode = self.mode;

        let targets: BTreeMap<String, &LookupRef> = equivalents
            .iter()
            .filter(|r| r.uri != subject.uri)
            .map(|r| (r.uri.clone(), r))
            .collect();

        let Some(current) = self
            .store
            .entries_for_uris(&[subject.uri.clone()])?
            .into_iter()
            .next()
        else {
            return Err(GraphError::SubjectNotFound {
                uri: subject.uri.clone(),
            }
            .into());
        };

        let previous: Vec<String> = mode
            .edges(&current)
            .outgoing()
            .filter(|r| r.uri != subject.uri)
            .map(|r| r.uri.clone())
            .collect();
        let seeds = std::iter::once(subject.uri.clone())
            .chain(targets.keys().cloned())
            .chain(previous.iter().cloned());
        let mut entries = load_component(self.store.as_ref(), seeds)?;
        if let Some(missing) = targets.keys().find(|uri| !entries.contains_key(*uri)) {
            return Err(GraphError::TargetNotFound {
                uri: missing.clone(),
            }
            .into());
        }

        let mut edited = BTreeSet::new();

        // Additions, vetoed by a blacklist on either side.
        for uri in targets.keys() {
            let vetoed = entries.get(&subject.uri).is_some_and(|s| s.blacklists(uri))
                || entries.get(uri).is_some_and(|t| t.blacklists(&subject.uri));
            if vetoed {
                debug!(subject = %subject.uri, target = %uri, "edge vetoed by blacklist");
                continue;
            }
            edited.extend(link(&mut entries, mode, &subject.uri, uri));
        }

        // Removals: in-scope edges this run no longer supports.
        for uri in &previous {
            let keep = targets.contains_key(uri)
                && !entries.get(&subject.uri).is_some_and(|s| s.blacklists(uri));
            let held_explicitly = mode == WriteMode::Direct
                && entries
                    .get(&subject.uri)
                    .is_some_and(|s| s.explicit.contains(uri));
            let in_scope = entries
                .get(uri)
                .is_some_and(|t| publishers.contains(&t.self_ref.publisher));
            if keep || held_explicitly || !in_scope {
                continue;
            }
            edited.extend(unlink(&mut entries, mode, &subject.uri, uri, Direction::Outgoing));
        }

        if edited.is_empty() {
            debug!(subject = %subject.uri, "lookup unchanged");
            return Ok(None);
        }
        let changed = self.commit(entries, edited, Utc::now())?;
        info!(
            subject = %subject.uri,
            targets = targets.len(),
            changed = changed.len(),
            "lookup written"
        );
        Ok(Some(changed))
    }
}

/// Add `from → to` and its mirror. Returns the uris that changed.
fn link(
    entries: &mut BTreeMap<String, LookupEntry>,
    mode: WriteMode,
    from: &str,
    to: &str,
) -> Vec<String> {
    let (Some(from_ref), Some(to_ref)) = (
        entries.get(from).map(|e| e.self_ref.clone()),
        entries.get(to).map(|e| e.self_ref.clone()),
    ) else {
        return Vec::new();
    };
    let mut changed = Vec::new();
    if let Some(e) = entries.get_mut(from) {
        if mode.edges_mut(e).insert(to_ref, Direction::Outgoing) {
            changed.push(from.to_string());
        }
    }
    if let Some(e) = entries.get_mut(to) {
        if mode.edges_mut(e).insert(from_ref, Direction::Incoming) {
            changed.push(to.to_string());
        }
    }
    changed
}

/// Take `direction` off `from → to` and the reverse off the mirror.
pub(crate) fn unlink(
    entries: &mut BTreeMap<String, LookupEntry>,
    mode: WriteMode,
    from: &str,
    to: &str,
    direction: Direction,
) -> Vec<String> {
    let mut changed = Vec::new();
    if let Some(e) = entries.get_mut(from) {
        if mode.edges_mut(e).remove_direction(to, direction) {
            changed.push(from.to_string());
        }
    }
    if let Some(e) = entries.get_mut(to) {
        if mode.edges_mut(e).remove_direction(from, direction.reverse()) {
            changed.push(to.to_string());
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use equiv_core::Content;

    use super::*;
    use crate::store::InMemoryLookupEntryStore;

    fn setup(uris: &[(&str, &str)]) -> (Arc<InMemoryLookupEntryStore>, TransitiveLookupWriter) {
        let store = Arc::new(InMemoryLookupEntryStore::new());
        for (i, (uri, publisher)) in uris.iter().enumerate() {
            store
                .ensure_lookup(&Content::item(*uri, *publisher).with_id(i as u64 + 1))
                .unwrap();
        }
        let writer = TransitiveLookupWriter::new(store.clone(), &GraphConfig::default());
        (store, writer)
    }

    fn r(store: &InMemoryLookupEntryStore, uri: &str) -> LookupRef {
        store.get(uri).unwrap().self_ref
    }

    fn publishers(keys: &[&str]) -> BTreeSet<Publisher> {
        keys.iter().map(|k| Publisher::new(*k)).collect()
    }

    #[test]
    fn write_is_mirrored_and_closed() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc"), ("c", "itv")]);
        let changed = writer
            .write_lookup(&r(&store, "a"), &[r(&store, "b"), r(&store, "c")], &publishers(&["bbc", "itv"]))
            .unwrap()
            .unwrap();
        assert_eq!(changed.len(), 3);
        let b = store.get("b").unwrap();
        assert_eq!(b.direct.direction("a"), Some(Direction::Incoming));
        assert_eq!(b.equivalent_uris().len(), 3);
    }

    #[test]
    fn repeated_write_is_a_no_op() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc")]);
        let scope = publishers(&["bbc"]);
        assert!(writer.write_lookup(&r(&store, "a"), &[r(&store, "b")], &scope).unwrap().is_some());
        assert!(writer.write_lookup(&r(&store, "a"), &[r(&store, "b")], &scope).unwrap().is_none());
    }

    #[test]
    fn unsupported_in_scope_edges_are_removed() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc"), ("c", "bbc")]);
        let scope = publishers(&["bbc"]);
        writer.write_lookup(&r(&store, "a"), &[r(&store, "b")], &scope).unwrap();
        writer.write_lookup(&r(&store, "a"), &[r(&store, "c")], &scope).unwrap();
        let a = store.get("a").unwrap();
        assert!(!a.direct.contains("b"));
        assert!(a.direct.contains("c"));
        assert!(!store.get("b").unwrap().direct.contains("a"));
        assert_eq!(store.get("b").unwrap().equivalents.len(), 1);
    }

    #[test]
    fn out_of_scope_edges_survive() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc"), ("c", "itv")]);
        writer
            .write_lookup(&r(&store, "a"), &[r(&store, "b")], &publishers(&["bbc"]))
            .unwrap();
        writer
            .write_lookup(&r(&store, "a"), &[r(&store, "c")], &publishers(&["itv"]))
            .unwrap();
        let a = store.get("a").unwrap();
        assert!(a.direct.contains("b") && a.direct.contains("c"));
    }

    #[test]
    fn blacklist_vetoes_the_edge() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc")]);
        let mut b = store.get("b").unwrap();
        b.blacklisted.insert(r(&store, "a"), Direction::Outgoing);
        store.store(b).unwrap();
        let result = writer
            .write_lookup(&r(&store, "a"), &[r(&store, "b")], &publishers(&["bbc"]))
            .unwrap();
        assert!(result.is_none());
        assert!(!store.get("a").unwrap().direct.contains("b"));
    }

    #[test]
    fn explicit_edges_are_kept_by_direct_writes() {
        let (store, writer) = setup(&[("a", "pa"), ("b", "bbc")]);
        let scope = publishers(&["bbc"]);
        writer.explicit().write_lookup(&r(&store, "a"), &[r(&store, "b")], &scope).unwrap();
        writer.write_lookup(&r(&store, "a"), &[r(&store, "b")], &scope).unwrap();
        writer.write_lookup(&r(&store, "a"), &[], &scope).unwrap();
        let a = store.get("a").unwrap();
        assert!(a.direct.contains("b"));
        assert!(a.explicit.contains("b"));
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let (_, writer) = setup(&[]);
        let ghost = LookupRef::from_content(&Content::item("ghost", "pa"));
        assert!(writer.write_lookup(&ghost, &[], &BTreeSet::new()).is_err());
    }

    #[test]
    fn oversized_components_defer_and_refresh() {
        let store = Arc::new(InMemoryLookupEntryStore::new());
        for (i, uri) in ["a", "b", "c"].iter().enumerate() {
            store
                .ensure_lookup(&Content::item(*uri, "bbc").with_id(i as u64 + 1))
                .unwrap();
        }
        let config = GraphConfig {
            max_transitive_set_size: 2,
            recompute_after_writes: 1,
            recompute_after_secs: 3_600,
        };
        let writer = TransitiveLookupWriter::new(store.clone(), &config);
        writer
            .write_lookup(&r(&store, "a"), &[r(&store, "b"), r(&store, "c")], &publishers(&["bbc"]))
            .unwrap();
        assert_eq!(store.get("a").unwrap().equivalents.len(), 1);
        assert!(writer.stale_closures().is_pending("a"));

        let rewritten = writer.refresh_stale(Utc::now()).unwrap();
        assert_eq!(rewritten, 3);
        assert_eq!(store.get("a").unwrap().equivalents.len(), 3);
        assert!(writer.stale_closures().is_empty());
    }
}
