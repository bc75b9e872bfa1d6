//! Fills missing ids on every ref in the graph.
//!
//! Walks entries in id order from a persisted cursor. Stoppable between
//! entries; a finished run resets the cursor so the next run starts over.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use equiv_core::config::BackfillConfig;
use equiv_core::errors::UpdateError;
use equiv_core::traits::{ILookupEntryStore, IProgressStore};
use equiv_core::{EquivRefs, EquivResult, LookupEntry};
use tracing::{debug, info};

/// Progress key under which the cursor is saved.
pub const BACKFILL_TASK: &str = "lookup-ref-backfill";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub processed: usize,
    pub updated: usize,
    /// Entries already filled as part of an earlier entry's equivalence set.
    pub skipped: usize,
    /// Id of the last entry processed; 0 once the walk completed.
    pub cursor: u64,
    pub finished: bool,
}

pub struct LookupRefBackfill {
    store: Arc<dyn ILookupEntryStore>,
    progress: Arc<dyn IProgressStore>,
    config: BackfillConfig,
    stop: Arc<AtomicBool>,
    running: AtomicBool,
}

impl LookupRefBackfill {
    pub fn new(
        store: Arc<dyn ILookupEntryStore>,
        progress: Arc<dyn IProgressStore>,
        config: BackfillConfig,
    ) -> Self {
        Self {
            store,
            progress,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            running: AtomicBool::new(false),
        }
    }

    /// Flag that stops the run before the next entry.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Walk the graph from `resume_from`, or from the saved cursor.
    pub fn run(&self, resume_from: Option<u64>) -> EquivResult<BackfillReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UpdateError::AlreadyRunning {
                key: BACKFILL_TASK.into(),
            }
            .into());
        }
        self.stop.store(false, Ordering::SeqCst);
        let result = self.walk(resume_from);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    fn walk(&self, resume_from: Option<u64>) -> EquivResult<BackfillReport> {
        let mut report = BackfillReport {
            cursor: match resume_from {
                Some(cursor) => cursor,
                None => self.progress.load(BACKFILL_TASK)?,
            },
            ..BackfillReport::default()
        };
        let save_every = self.config.save_every.max(1);
        let mut seen: HashSet<String> = HashSet::new();
        info!(cursor = report.cursor, "backfill starting");

        loop {
            if self.stop.load(Ordering::SeqCst) {
                self.progress.save(BACKFILL_TASK, report.cursor)?;
                info!(cursor = report.cursor, processed = report.processed, "backfill stopped");
                return Ok(report);
            }
            let batch = self.store.entries_after(report.cursor, self.config.batch_size.max(1))?;
            if batch.is_empty() {
                break;
            }
            for entry in batch {
                if self.stop.load(Ordering::SeqCst) {
                    break;
                }
                if let Some(id) = entry.id {
                    report.cursor = report.cursor.max(id);
                }
                if seen.contains(&entry.uri) {
                    report.skipped += 1;
                } else {
                    report.updated += self.backfill_entry(entry, &mut seen)?;
                }
                report.processed += 1;
                if report.processed % save_every == 0 {
                    self.progress.save(BACKFILL_TASK, report.cursor)?;
                }
            }
        }

        report.cursor = 0;
        report.finished = true;
        self.progress.save(BACKFILL_TASK, 0)?;
        info!(processed = report.processed, updated = report.updated, "backfill finished");
        Ok(report)
    }

    /// Bring one entry, and the rest of its equivalence set, to canonical
    /// form. Returns how many entries were rewritten.
    fn backfill_entry(&self, mut entry: LookupEntry, seen: &mut HashSet<String>) -> EquivResult<usize> {
        if !entry.has_missing_ids() {
            seen.insert(entry.uri.clone());
            return Ok(0);
        }
        if entry.blacklisted.is_empty() && is_isolated(&entry) {
            seen.insert(entry.uri.clone());
            if !canonicalise_solo(&mut entry) {
                return Ok(0);
            }
            debug!(uri = %entry.uri, "solo entry canonicalised");
            self.store.store(entry)?;
            return Ok(1);
        }

        let mut uris = entry.equivalent_uris();
        uris.insert(entry.uri.clone());
        let members = self.store.entries_for_uris(&uris.into_iter().collect::<Vec<_>>())?;
        let ids = self.referenced_ids(&members)?;
        let mut updated = 0;
        for mut member in members {
            seen.insert(member.uri.clone());
            if member.fill_ids(|uri| ids.get(uri).copied()) {
                debug!(uri = %member.uri, "lookup refs backfilled");
                self.store.store(member)?;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Ids for every uri the given entries hold a ref to without one.
    fn referenced_ids(&self, entries: &[LookupEntry]) -> EquivResult<BTreeMap<String, u64>> {
        let mut ids: BTreeMap<String, u64> = entries
            .iter()
            .filter_map(|e| e.id.or(e.self_ref.id).map(|id| (e.uri.clone(), id)))
            .collect();
        let unresolved: BTreeSet<String> = entries
            .iter()
            .flat_map(|e| {
                e.direct
                    .refs()
                    .chain(e.explicit.refs())
                    .chain(e.blacklisted.refs())
                    .chain(e.equivalents.iter())
                    .filter(|r| r.id.is_none())
                    .map(|r| r.uri.clone())
                    .chain(e.self_ref.id.is_none().then(|| e.uri.clone()))
            })
            .filter(|uri| !ids.contains_key(uri))
            .collect();
        if !unresolved.is_empty() {
            let found = self
                .store
                .entries_for_uris(&unresolved.into_iter().collect::<Vec<_>>())?;
            ids.extend(found.into_iter().filter_map(|e| e.id.map(|id| (e.uri, id))));
        }
        Ok(ids)
    }
}

/// No edge to anything but itself and a closure of just itself.
fn is_isolated(entry: &LookupEntry) -> bool {
    let only_self = |refs: &EquivRefs| refs.uris().all(|u| u == entry.uri);
    only_self(&entry.direct)
        && only_self(&entry.explicit)
        && entry.equivalents.iter().all(|r| r.uri == entry.uri)
}

/// Rewrite an isolated entry to the minimal self-edge form.
fn canonicalise_solo(entry: &mut LookupEntry) -> bool {
    let mut self_ref = entry.self_ref.clone();
    if self_ref.id.is_none() {
        self_ref.id = entry.id;
    }
    let canonical = EquivRefs::self_only(&self_ref);
    let mut changed = entry.self_ref.id != self_ref.id;
    changed |= !same_edges(&entry.direct, &canonical) || !same_edges(&entry.explicit, &canonical);
    changed |= entry.equivalents.len() != 1
        || entry.equivalents.iter().any(|r| r.id != self_ref.id);
    if changed {
        entry.self_ref = self_ref.clone();
        entry.direct = canonical.clone();
        entry.explicit = canonical;
        entry.equivalents = std::iter::once(self_ref).collect();
    }
    changed
}

/// Edge equality including ids.
fn same_edges(a: &EquivRefs, b: &EquivRefs) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.target.uri == y.target.uri && x.target.id == y.target.id && x.direction == y.direction)
}
