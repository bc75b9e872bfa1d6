//! Removal of equivalence edges on request.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use equiv_core::errors::GraphError;
use equiv_core::{EquivResult, LookupEntry};
use tracing::info;

use crate::component::load_component;
use crate::writer::{TransitiveLookupWriter, WriteMode};

/// Breaks edges through the writer's lock so closures stay consistent.
pub struct EquivalenceBreaker {
    writer: Arc<TransitiveLookupWriter>,
}

impl EquivalenceBreaker {
    pub fn new(writer: Arc<TransitiveLookupWriter>) -> Self {
        Self { writer }
    }

    /// Remove the direct edge between `subject_uri` and `target_uri`, both ways.
    ///
    /// Fails without writing when the subject has no entry or holds no such edge.
    /// Returns the subject's updated entry.
    pub fn remove_from_set(&self, subject_uri: &str, target_uri: &str) -> EquivResult<LookupEntry> {
        let _guard = self.writer.lock(subject_uri)?;
        let subject = self.subject_entry(subject_uri)?;
        if target_uri == subject_uri || !subject.direct.contains(target_uri) {
            return Err(GraphError::EdgeNotFound {
                subject: subject_uri.to_string(),
                target: target_uri.to_string(),
            }
            .into());
        }

        let changed = self.remove(subject_uri, &[target_uri.to_string()], WriteMode::Direct)?;
        info!(subject = subject_uri, target = target_uri, "equivalence broken");
        Ok(changed
            .into_iter()
            .find(|e| e.uri == subject_uri)
            .unwrap_or(subject))
    }

    /// Remove several direct edges at once. The subject's own uri and absent
    /// edges are ignored. `None` when nothing changed.
    pub fn remove_direct(
        &self,
        subject_uri: &str,
        targets: &[String],
    ) -> EquivResult<Option<LookupEntry>> {
        self.remove_bulk(subject_uri, targets, WriteMode::Direct)
    }

    /// As [`Self::remove_direct`], for curated edges.
    pub fn remove_explicit(
        &self,
        subject_uri: &str,
        targets: &[String],
    ) -> EquivResult<Option<LookupEntry>> {
        self.remove_bulk(subject_uri, targets, WriteMode::Explicit)
    }

    fn remove_bulk(
        &self,
        subject_uri: &str,
        targets: &[String],
        mode: WriteMode,
    ) -> EquivResult<Option<LookupEntry>> {
        let _guard = self.writer.lock(subject_uri)?;
        self.subject_entry(subject_uri)?;
        let changed = self.remove(subject_uri, targets, mode)?;
        if changed.is_empty() {
            return Ok(None);
        }
        info!(
            subject = subject_uri,
            removed = targets.len(),
            mode = ?mode,
            "equivalences removed"
        );
        Ok(changed.into_iter().find(|e| e.uri == subject_uri))
    }

    fn subject_entry(&self, uri: &str) -> EquivResult<LookupEntry> {
        self.writer
            .store()
            .entries_for_uris(&[uri.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| GraphError::SubjectNotFound { uri: uri.to_string() }.into())
    }

    /// Caller holds the write lock.
    fn remove(
        &self,
        subject_uri: &str,
        targets: &[String],
        mode: WriteMode,
    ) -> EquivResult<Vec<LookupEntry>> {
        let targets: BTreeSet<&String> = targets.iter().filter(|t| *t != subject_uri).collect();
        let seeds = std::iter::once(subject_uri.to_string()).chain(targets.iter().map(|t| t.to_string()));
        let mut entries = load_component(self.writer.store().as_ref(), seeds)?;

        let mut edited = BTreeSet::new();
        for target in targets {
            if let Some(subject) = entries.get_mut(subject_uri) {
                if mode.edges_mut(subject).remove(target).is_some() {
                    edited.insert(subject_uri.to_string());
                }
            }
            if let Some(other) = entries.get_mut(target.as_str()) {
                if mode.edges_mut(other).remove(subject_uri).is_some() {
                    edited.insert(target.clone());
                }
            }
        }
        if edited.is_empty() {
            return Ok(Vec::new());
        }
        self.writer.commit(entries, edited, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use equiv_core::config::GraphConfig;
    use equiv_core::traits::{ILookupEntryStore, ILookupWriter};
    use equiv_core::{Content, EquivError, Publisher};

    use super::*;
    use crate::store::InMemoryLookupEntryStore;

    fn graph() -> (Arc<InMemoryLookupEntryStore>, Arc<TransitiveLookupWriter>) {
        let store = Arc::new(InMemoryLookupEntryStore::new());
        for (i, uri) in ["a", "b", "c"].iter().enumerate() {
            store
                .ensure_lookup(&Content::item(*uri, "bbc").with_id(i as u64 + 1))
                .unwrap();
        }
        let writer = Arc::new(TransitiveLookupWriter::new(store.clone(), &GraphConfig::default()));
        (store, writer)
    }

    fn write(store: &InMemoryLookupEntryStore, writer: &TransitiveLookupWriter, from: &str, to: &[&str]) {
        let refs: Vec<_> = to.iter().map(|u| store.get(u).unwrap().self_ref).collect();
        let scope = [Publisher::new("bbc")].into_iter().collect();
        writer
            .write_lookup(&store.get(from).unwrap().self_ref, &refs, &scope)
            .unwrap();
    }

    #[test]
    fn missing_edge_is_an_error() {
        let (_, writer) = graph();
        let breaker = EquivalenceBreaker::new(writer);
        let err = breaker.remove_from_set("a", "b").unwrap_err();
        assert!(matches!(err, EquivError::GraphError(GraphError::EdgeNotFound { .. })));
        let err = breaker.remove_from_set("missing", "b").unwrap_err();
        assert!(matches!(err, EquivError::GraphError(GraphError::SubjectNotFound { .. })));
    }

    #[test]
    fn bulk_removal_ignores_self_and_absent_edges() {
        let (store, writer) = graph();
        write(&store, &writer, "a", &["b", "c"]);
        let breaker = EquivalenceBreaker::new(writer);
        let updated = breaker
            .remove_direct("a", &["a".into(), "b".into(), "zzz".into()])
            .unwrap()
            .unwrap();
        assert!(updated.direct.contains("a"));
        assert!(!updated.direct.contains("b"));
        assert!(updated.direct.contains("c"));
        assert!(breaker.remove_direct("a", &["b".into()]).unwrap().is_none());
    }

    #[test]
    fn explicit_removal_leaves_direct_edges() {
        let (store, writer) = graph();
        write(&store, &writer, "a", &["b"]);
        write(&store, &writer.explicit(), "a", &["b"]);
        let breaker = EquivalenceBreaker::new(writer);
        breaker.remove_explicit("a", &["b".into()]).unwrap();
        let a = store.get("a").unwrap();
        assert!(a.direct.contains("b"));
        assert!(!a.explicit.contains("b"));
        assert_eq!(store.entries_for_uris(&["b".into()]).unwrap()[0].equivalents.len(), 2);
    }
}
