//! Property tests for repeated updates over the catalogue.

use std::sync::Arc;

use proptest::prelude::*;

use equiv_core::config::{EquivConfig, PublisherProfile};
use equiv_graph::InMemoryLookupEntryStore;
use equiv_update::{EquivalenceService, RecentResultStore, ServiceDependencies};
use test_fixtures::{
    load_fixture, CatalogueFixture, InMemoryProgressStore, InMemorySummaryStore, RecordingMessageSender,
};

fn service() -> (EquivalenceService, Arc<InMemoryLookupEntryStore>) {
    let catalogue: CatalogueFixture = load_fixture("scenarios/content/brand_catalogue.json");
    let content = Arc::new(catalogue.into_store());
    let lookups = Arc::new(InMemoryLookupEntryStore::new());
    let config = EquivConfig {
        publishers: vec![PublisherProfile::new("pressassociation.com", &["bbc.co.uk"])],
        ..EquivConfig::default()
    };
    let deps = ServiceDependencies {
        content: content.clone(),
        lister: content.clone(),
        search: content.clone(),
        schedules: content,
        lookups: lookups.clone(),
        summaries: Arc::new(InMemorySummaryStore::new()),
        results: Arc::new(RecentResultStore::new(100)),
        messages: Arc::new(RecordingMessageSender::new()),
        progress: Arc::new(InMemoryProgressStore::new()),
    };
    (EquivalenceService::new(&config, deps).unwrap(), lookups)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn second_pass_over_the_same_subjects_changes_nothing(ids in proptest::collection::vec(100u64..=102, 1..5)) {
        let (service, lookups) = service();
        for id in &ids {
            service.process_subject(*id).unwrap();
        }
        let before = lookups.all();

        for id in &ids {
            let report = service.process_subject(*id).unwrap();
            prop_assert!(!report.changed, "subject {} changed on the second pass", id);
        }
        prop_assert_eq!(lookups.all(), before);
    }

    #[test]
    fn written_edges_are_mirrored(ids in proptest::collection::vec(100u64..=102, 1..5)) {
        let (service, lookups) = service();
        for id in &ids {
            service.process_subject(*id).unwrap();
        }
        for entry in lookups.all() {
            for target in entry.direct.refs() {
                let other = lookups.get(&target.uri).unwrap();
                prop_assert!(other.direct.contains(&entry.uri), "{} -> {} has no mirror", entry.uri, target.uri);
            }
        }
    }
}
