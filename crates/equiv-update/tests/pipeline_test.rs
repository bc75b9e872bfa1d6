//! The full service over the Doctor Who catalogue: an episode that needs its
//! brand first, the retry, the written graph, and the outbound messages.

use std::sync::Arc;

use equiv_core::config::{EquivConfig, PublisherProfile};
use equiv_core::models::EquivalenceNotification;
use equiv_core::Publisher;
use equiv_graph::InMemoryLookupEntryStore;
use equiv_update::{EquivalenceService, RecentResultStore, ServiceDependencies, SkipReason, WorkOutcome};
use test_fixtures::{
    load_fixture, CatalogueFixture, InMemoryContentStore, InMemoryProgressStore, InMemorySummaryStore,
    RecordingMessageSender,
};

const PA_BRAND: &str = "http://pressassociation.com/brands/doctor-who";
const PA_EP1: &str = "http://pressassociation.com/episodes/dw-1";
const BBC_BRAND: &str = "http://www.bbc.co.uk/programmes/b006q2x0";
const BBC_EP1: &str = "http://www.bbc.co.uk/programmes/b0074dlv";
const BBC_CONFIDENTIAL: &str = "http://www.bbc.co.uk/programmes/doctor-who-confidential";

struct Harness {
    service: EquivalenceService,
    content: Arc<InMemoryContentStore>,
    lookups: Arc<InMemoryLookupEntryStore>,
    summaries: Arc<InMemorySummaryStore>,
    messages: Arc<RecordingMessageSender>,
    progress: Arc<InMemoryProgressStore>,
}

fn harness_with(messages: RecordingMessageSender) -> Harness {
    let catalogue: CatalogueFixture = load_fixture("scenarios/content/brand_catalogue.json");
    let content = Arc::new(catalogue.into_store());
    let lookups = Arc::new(InMemoryLookupEntryStore::new());
    let summaries = Arc::new(InMemorySummaryStore::new());
    let messages = Arc::new(messages);
    let progress = Arc::new(InMemoryProgressStore::new());

    let config = EquivConfig {
        publishers: vec![PublisherProfile::new("pressassociation.com", &["bbc.co.uk"])],
        ..EquivConfig::default()
    };
    let deps = ServiceDependencies {
        content: content.clone(),
        lister: content.clone(),
        search: content.clone(),
        schedules: content.clone(),
        lookups: lookups.clone(),
        summaries: summaries.clone(),
        results: Arc::new(RecentResultStore::new(100)),
        messages: messages.clone(),
        progress: progress.clone(),
    };
    Harness {
        service: EquivalenceService::new(&config, deps).unwrap(),
        content,
        lookups,
        summaries,
        messages,
        progress,
    }
}

fn harness() -> Harness {
    harness_with(RecordingMessageSender::new())
}

#[test]
fn episode_runs_after_its_brand_and_links_the_matching_episode() {
    let h = harness();
    let report = h.service.process_subject(101).unwrap();

    assert_eq!(report.subject_uri.as_deref(), Some(PA_EP1));
    assert!(report.changed);
    let audit = report.audit.unwrap();
    assert_eq!(audit.accepted_uris().collect::<Vec<_>>(), vec![BBC_EP1]);

    let brand = h.lookups.get(PA_BRAND).unwrap();
    assert!(brand.direct.contains(BBC_BRAND));
    assert!(!brand.direct.contains(BBC_CONFIDENTIAL));
    let brand_summary = h.summaries.get(PA_BRAND).unwrap();
    assert_eq!(
        brand_summary
            .equivalents_for(&Publisher::new("bbc.co.uk"))
            .iter()
            .map(|r| r.uri.as_str())
            .collect::<Vec<_>>(),
        vec![BBC_BRAND]
    );

    let episode = h.lookups.get(PA_EP1).unwrap();
    assert!(episode.direct.contains(BBC_EP1));
    assert!(h.lookups.get(BBC_EP1).unwrap().direct.contains(PA_EP1));

    let subjects: Vec<String> = h.messages.sent().into_iter().map(|m| m.subject.uri).collect();
    assert_eq!(subjects, vec![PA_BRAND.to_string(), PA_EP1.to_string()]);
}

#[test]
fn running_again_on_unchanged_input_changes_nothing() {
    let h = harness();
    assert!(h.service.process_subject(101).unwrap().changed);
    let before = h.lookups.get(PA_EP1).unwrap().direct;
    let sent = h.messages.sent().len();

    let again = h.service.process_subject(101).unwrap();
    assert!(!again.changed);
    assert_eq!(h.lookups.get(PA_EP1).unwrap().direct, before);
    assert_eq!(h.messages.sent().len(), sent);
}

#[test]
fn audit_record_is_kept_for_inspection() {
    let h = harness();
    h.service.process_subject(100).unwrap();
    let record = h.service.recent_result(PA_BRAND).unwrap();
    assert!(record.source_scores.contains_key("Title"));
    assert!(record.combined.contains_key(BBC_BRAND));
    assert!(!record.combined.contains_key(BBC_CONFIDENTIAL));
    assert!(!record.description.is_empty());
}

#[test]
fn unconfigured_publishers_are_skipped() {
    let h = harness();
    let report = h.service.process_subject(201).unwrap();
    assert_eq!(report.skipped, Some(SkipReason::NotConfigured));
    assert!(h.lookups.get(BBC_EP1).is_none());
}

#[test]
fn duplicate_notifications_inside_the_window_run_once() {
    let h = harness();
    let notification = EquivalenceNotification::new(100);
    let first = h.service.handle_notification(&notification).unwrap();
    assert!(first.changed());
    let second = h.service.handle_notification(&EquivalenceNotification::new(100)).unwrap();
    assert_eq!(second, WorkOutcome::Skipped(SkipReason::RecentlyProcessed));
}

#[test]
fn failed_messenger_is_reported_but_the_graph_is_written() {
    let h = harness_with(RecordingMessageSender::failing());
    let report = h.service.process_subject(100).unwrap();
    assert!(report.changed);
    assert!(h.lookups.get(PA_BRAND).unwrap().direct.contains(BBC_BRAND));
}

#[test]
fn breaking_an_accepted_edge_removes_both_directions() {
    let h = harness();
    h.service.process_subject(100).unwrap();
    let brand = h.service.break_equivalence(PA_BRAND, BBC_BRAND).unwrap();
    assert!(brand.direct.contains(PA_BRAND));
    assert!(!brand.direct.contains(BBC_BRAND));
    assert!(!h.lookups.get(BBC_BRAND).unwrap().direct.contains(PA_BRAND));
    assert!(h.service.break_equivalence(PA_BRAND, BBC_BRAND).is_err());
}

#[test]
fn rescan_covers_brand_then_episodes_and_resets_progress() {
    let h = harness();
    let report = h.service.rescan(&[Publisher::new("pressassociation.com")]).unwrap();

    assert!(report.finished);
    // brand and both episodes, the episodes again skipped at the top level
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);
    assert!(h.lookups.get(PA_EP1).unwrap().direct.contains(BBC_EP1));
    assert_eq!(
        h.progress.saves().last(),
        Some(&("pressassociation.com-equivalence".to_string(), 0))
    );
}

#[test]
fn backfill_after_updates_completes() {
    let h = harness();
    h.service.process_subject(101).unwrap();
    assert_eq!(h.service.backfill_ids(None).unwrap(), 0);
    assert_eq!(h.service.backfill_ids(None).unwrap(), 0);
}

#[test]
fn content_outage_surfaces_as_an_error() {
    let h = harness();
    h.content.set_unavailable(true);
    assert!(h.service.process_subject(101).is_err());
}
