//! Breaking equivalences end to end through the writer and the store.

use std::collections::BTreeSet;
use std::sync::Arc;

use equiv_core::config::GraphConfig;
use equiv_core::traits::{ILookupEntryStore, ILookupWriter};
use equiv_core::{Content, Direction, LookupRef, Publisher};
use equiv_graph::{EquivalenceBreaker, InMemoryLookupEntryStore, TransitiveLookupWriter};

fn graph(uris: &[&str]) -> (Arc<InMemoryLookupEntryStore>, Arc<TransitiveLookupWriter>) {
    let store = Arc::new(InMemoryLookupEntryStore::new());
    for (i, uri) in uris.iter().enumerate() {
        store
            .ensure_lookup(&Content::item(*uri, "bbc.co.uk").with_id(i as u64 + 1))
            .unwrap();
    }
    let writer = Arc::new(TransitiveLookupWriter::new(store.clone(), &GraphConfig::default()));
    (store, writer)
}

fn self_ref(store: &InMemoryLookupEntryStore, uri: &str) -> LookupRef {
    store.get(uri).unwrap().self_ref
}

fn scope() -> BTreeSet<Publisher> {
    [Publisher::new("bbc.co.uk")].into_iter().collect()
}

#[test]
fn breaking_the_only_edge_removes_both_directions() {
    let (store, writer) = graph(&["A", "B"]);
    writer
        .write_lookup(&self_ref(&store, "A"), &[self_ref(&store, "B")], &scope())
        .unwrap();
    assert_eq!(store.get("B").unwrap().direct.direction("A"), Some(Direction::Incoming));

    let breaker = EquivalenceBreaker::new(writer);
    let a = breaker.remove_from_set("A", "B").unwrap();

    assert!(a.direct.contains("A"));
    assert!(!a.direct.contains("B"));
    let b = store.get("B").unwrap();
    assert!(!b.direct.contains("A"));
    assert_eq!(a.equivalents.len(), 1);
    assert_eq!(b.equivalents.len(), 1);
}

#[test]
fn breaking_one_edge_of_a_chain_splits_the_component() {
    let (store, writer) = graph(&["A", "B", "C"]);
    writer
        .write_lookup(&self_ref(&store, "A"), &[self_ref(&store, "B")], &scope())
        .unwrap();
    writer
        .write_lookup(&self_ref(&store, "B"), &[self_ref(&store, "A"), self_ref(&store, "C")], &scope())
        .unwrap();
    assert_eq!(store.get("C").unwrap().equivalents.len(), 3);

    EquivalenceBreaker::new(writer).remove_from_set("B", "C").unwrap();

    assert_eq!(store.get("A").unwrap().equivalent_uris().len(), 2);
    assert_eq!(store.get("C").unwrap().equivalent_uris().len(), 1);
}

#[test]
fn failed_break_writes_nothing() {
    let (store, writer) = graph(&["A", "B"]);
    let before = store.all();
    assert!(EquivalenceBreaker::new(writer).remove_from_set("A", "B").is_err());
    assert_eq!(store.all(), before);
}
