//! Property tests for graph writes and the id backfill.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use equiv_core::config::{BackfillConfig, GraphConfig};
use equiv_core::traits::{ILookupEntryStore, ILookupWriter};
use equiv_core::{Content, Publisher};
use equiv_graph::{InMemoryLookupEntryStore, LookupRefBackfill, TransitiveLookupWriter};
use test_fixtures::InMemoryProgressStore;

const NODES: usize = 6;
const PUBLISHERS: [&str; 3] = ["pa", "bbc", "itv"];

fn uri(i: usize) -> String {
    format!("node-{i}")
}

fn populated() -> Arc<InMemoryLookupEntryStore> {
    let store = Arc::new(InMemoryLookupEntryStore::new());
    for i in 0..NODES {
        let content = Content::item(uri(i), PUBLISHERS[i % PUBLISHERS.len()]).with_id(i as u64 + 1);
        store.ensure_lookup(&content).unwrap();
    }
    store
}

/// A write: subject index plus accepted target indices.
fn writes_strategy() -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
    proptest::collection::vec(
        (0..NODES, proptest::collection::vec(0..NODES, 0..4)),
        1..12,
    )
}

fn apply(store: &Arc<InMemoryLookupEntryStore>, writer: &TransitiveLookupWriter, writes: &[(usize, Vec<usize>)]) {
    let scope: BTreeSet<Publisher> = PUBLISHERS.iter().map(|p| Publisher::new(*p)).collect();
    for (subject, targets) in writes {
        let subject_ref = store.get(&uri(*subject)).unwrap().self_ref;
        let refs: Vec<_> = targets
            .iter()
            .map(|t| store.get(&uri(*t)).unwrap().self_ref)
            .collect();
        writer.write_lookup(&subject_ref, &refs, &scope).unwrap();
    }
}

proptest! {
    #[test]
    fn direct_edges_stay_symmetric(writes in writes_strategy()) {
        let store = populated();
        let writer = TransitiveLookupWriter::new(store.clone(), &GraphConfig::default());
        apply(&store, &writer, &writes);

        for entry in store.all() {
            for target in entry.direct.refs() {
                let other = store.get(&target.uri).unwrap();
                prop_assert!(other.direct.contains(&entry.uri), "{} -> {} has no mirror", entry.uri, target.uri);
            }
            prop_assert!(entry.direct.contains(&entry.uri));
        }
    }

    #[test]
    fn closures_agree_across_a_component(writes in writes_strategy()) {
        let store = populated();
        let writer = TransitiveLookupWriter::new(store.clone(), &GraphConfig::default());
        apply(&store, &writer, &writes);

        for entry in store.all() {
            for member in &entry.equivalents {
                let other = store.get(&member.uri).unwrap();
                prop_assert_eq!(other.equivalent_uris(), entry.equivalent_uris());
            }
        }
    }

    #[test]
    fn repeating_the_last_write_changes_nothing(writes in writes_strategy()) {
        let store = populated();
        let writer = TransitiveLookupWriter::new(store.clone(), &GraphConfig::default());
        apply(&store, &writer, &writes);
        let before = store.all();
        if let Some(last) = writes.last() {
            apply(&store, &writer, std::slice::from_ref(last));
        }
        prop_assert_eq!(store.all(), before);
    }

    #[test]
    fn second_backfill_mutates_nothing(writes in writes_strategy()) {
        let store = populated();
        let writer = TransitiveLookupWriter::new(store.clone(), &GraphConfig::default());
        apply(&store, &writer, &writes);

        let backfill = LookupRefBackfill::new(
            store.clone(),
            Arc::new(InMemoryProgressStore::new()),
            BackfillConfig::default(),
        );
        backfill.run(Some(0)).unwrap();
        let after_first = store.all();
        let second = backfill.run(Some(0)).unwrap();
        prop_assert_eq!(second.updated, 0);
        prop_assert_eq!(store.all(), after_first);
    }
}
