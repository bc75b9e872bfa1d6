use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use equiv_core::candidates::ScoredCandidate;
use equiv_core::models::*;
use equiv_core::{AuditTrail, Content, Publisher, Score, ScoredCandidates};

fn results() -> EquivalenceResults {
    let subject = Arc::new(Content::item("s", "pa").with_id(1).with_title("Film"));
    let x = Arc::new(Content::item("x", "bbc"));
    let y = Arc::new(Content::item("y", "bbc"));
    let mut title = ScoredCandidates::new("Title");
    title.add(x.clone(), Score::Real(2.0));
    title.add(y.clone(), Score::Null);
    let mut combined = ScoredCandidates::new("combined");
    combined.add(x.clone(), Score::Real(2.0));
    let mut accepted = BTreeMap::new();
    accepted.insert(
        Publisher::new("bbc"),
        vec![ScoredCandidate::new(x, Score::Real(2.0))],
    );
    let mut trail = AuditTrail::new();
    trail.append("accepted x");
    EquivalenceResults {
        subject,
        raw_scores: vec![title],
        combined,
        accepted,
        trail,
    }
}

#[test]
fn stored_result_keeps_null_scores_distinct_from_zero() {
    let stored = StoredEquivalenceResult::from_results(&results(), Utc::now());
    assert_eq!(stored.source_scores["Title"]["y"], Score::Null);
    assert_eq!(stored.source_scores["Title"]["x"], Score::Real(2.0));
    assert_eq!(stored.accepted_uris().collect::<Vec<_>>(), vec!["x"]);
    assert!(stored.description.contains("accepted x"));

    let json = serde_json::to_string(&stored).unwrap();
    let back: StoredEquivalenceResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stored);
}

#[test]
fn assertion_message_lists_accepted_candidates() {
    let msg = EquivalenceAssertionMessage::from_results(
        &results(),
        vec![Publisher::new("bbc")],
        Utc::now(),
    );
    assert_eq!(msg.subject.uri, "s");
    assert_eq!(msg.assertions.len(), 1);
    assert_eq!(msg.assertions[0].uri, "x");
    assert!(uuid::Uuid::parse_str(&msg.message_id).is_ok());
}

#[test]
fn notification_slot_falls_back_to_subject_id() {
    let n = EquivalenceNotification::new(42);
    assert_eq!(n.slot(), "42");
    assert_eq!(n.with_lock_key("bbcone-2024-03-01T20:00").slot(), "bbcone-2024-03-01T20:00");
}

#[test]
fn summary_lookup_by_publisher() {
    let mut summary = EquivalenceSummary::new("brand", None);
    summary.equivalents.insert(
        Publisher::new("bbc"),
        vec![SummaryRef {
            uri: "bbc-brand".into(),
            id: Some(3),
            publisher: Publisher::new("bbc"),
            parent: None,
        }],
    );
    assert_eq!(summary.equivalents_for(&Publisher::new("bbc")).len(), 1);
    assert!(summary.equivalents_for(&Publisher::new("itv")).is_empty());
}
