//! Property tests for combiners and extractors.

use std::sync::Arc;

use proptest::prelude::*;

use equiv_core::candidates::sort_by_score;
use equiv_core::traits::{IEquivalenceExtractor, IScoreCombiner};
use equiv_core::{AuditTrail, Content, Score, ScoredCandidates};
use equiv_results::combining::{AdditiveCombiner, NullScoreAwareAveragingCombiner};
use equiv_results::extraction::{
    AllOverOrEqualThresholdExtractor, NTimesAboveNextBestExtractor, SameHighScoreAndPublisherExtractor,
};

fn score_strategy() -> impl Strategy<Value = Score> {
    prop_oneof![
        1 => Just(Score::Null),
        3 => (-5.0f64..5.0).prop_map(Score::Real),
    ]
}

/// Per source, a score for each of three candidates.
fn sources_strategy() -> impl Strategy<Value = Vec<Vec<Score>>> {
    proptest::collection::vec(proptest::collection::vec(score_strategy(), 3), 1..5)
}

fn build_sources(raw: &[Vec<Score>]) -> Vec<ScoredCandidates> {
    let candidates: Vec<Arc<Content>> = ["a", "b", "c"]
        .iter()
        .map(|u| Arc::new(Content::item(*u, "bbc")))
        .collect();
    raw.iter()
        .enumerate()
        .map(|(i, scores)| {
            let mut set = ScoredCandidates::new(format!("source-{i}"));
            for (c, s) in candidates.iter().zip(scores) {
                set.add(c.clone(), *s);
            }
            set
        })
        .collect()
}

proptest! {
    #[test]
    fn averaging_ignores_abstaining_sources(raw in sources_strategy()) {
        let sources = build_sources(&raw);
        let subject = Content::item("s", "pa");
        let combined = NullScoreAwareAveragingCombiner::new().combine(&subject, &sources, &mut AuditTrail::new());

        for (idx, uri) in ["a", "b", "c"].iter().enumerate() {
            let reals: Vec<f64> = raw.iter().filter_map(|s| s[idx].as_f64()).collect();
            match combined.score_of(uri) {
                None => prop_assert!(reals.is_empty()),
                Some(score) => {
                    let expected = reals.iter().sum::<f64>() / reals.len() as f64;
                    prop_assert!((score.as_f64().unwrap() - expected).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn adding_an_abstaining_source_never_changes_the_average(raw in sources_strategy()) {
        let subject = Content::item("s", "pa");
        let base = NullScoreAwareAveragingCombiner::new().combine(&subject, &build_sources(&raw), &mut AuditTrail::new());
        let mut with_null = raw.clone();
        with_null.push(vec![Score::Null; 3]);
        let extended = NullScoreAwareAveragingCombiner::new().combine(&subject, &build_sources(&with_null), &mut AuditTrail::new());
        for uri in ["a", "b", "c"] {
            prop_assert_eq!(base.score_of(uri), extended.score_of(uri));
        }
    }

    #[test]
    fn additive_is_order_independent(raw in sources_strategy()) {
        let subject = Content::item("s", "pa");
        let forward = AdditiveCombiner.combine(&subject, &build_sources(&raw), &mut AuditTrail::new());
        let mut reversed = raw.clone();
        reversed.reverse();
        let backward = AdditiveCombiner.combine(&subject, &build_sources(&reversed), &mut AuditTrail::new());
        for uri in ["a", "b", "c"] {
            let (f, b) = (forward.score_of(uri).unwrap(), backward.score_of(uri).unwrap());
            match (f.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-9),
                (None, None) => {}
                _ => prop_assert!(false, "null mismatch"),
            }
        }
    }

    #[test]
    fn extractors_return_subsets(raw in proptest::collection::vec(-2.0f64..5.0, 0..8)) {
        let mut pool: Vec<_> = raw
            .iter()
            .enumerate()
            .map(|(i, s)| equiv_core::ScoredCandidate::new(Arc::new(Content::item(format!("u{i}"), "bbc")), Score::Real(*s)))
            .collect();
        sort_by_score(&mut pool);
        let subject = Content::item("s", "pa");
        let extractors: Vec<Box<dyn IEquivalenceExtractor>> = vec![
            Box::new(AllOverOrEqualThresholdExtractor::new(1.0)),
            Box::new(NTimesAboveNextBestExtractor::new(1.5)),
            Box::new(SameHighScoreAndPublisherExtractor::new(0.5)),
        ];
        for e in extractors {
            let accepted = e.extract(&pool, &subject, &mut AuditTrail::new());
            prop_assert!(accepted.len() <= pool.len());
            for a in &accepted {
                prop_assert!(pool.iter().any(|p| p.uri() == a.uri()));
            }
        }
    }
}
