use std::collections::BTreeSet;

use equiv_core::traits::IScoreCombiner;
use equiv_core::{AuditTrail, Content, ScoreThreshold, ScoredCandidates};

/// Gate in front of another combiner.
///
/// A candidate reaches the delegate only if at least one named source that ran
/// gave it a score passing `threshold`. When none of the named sources
/// produced a set, everything passes through.
pub struct RequiredScoreFilteringCombiner {
    delegate: Box<dyn IScoreCombiner>,
    required: Vec<String>,
    threshold: ScoreThreshold,
}

impl RequiredScoreFilteringCombiner {
    pub fn new(delegate: Box<dyn IScoreCombiner>, required_source: impl Into<String>) -> Self {
        Self {
            delegate,
            required: vec![required_source.into()],
            threshold: ScoreThreshold::Positive,
        }
    }

    pub fn with_sources(delegate: Box<dyn IScoreCombiner>, required: Vec<String>) -> Self {
        Self {
            delegate,
            required,
            threshold: ScoreThreshold::Positive,
        }
    }

    pub fn with_threshold(mut self, threshold: ScoreThreshold) -> Self {
        self.threshold = threshold;
        self
    }
}

impl IScoreCombiner for RequiredScoreFilteringCombiner {
    fn name(&self) -> &str {
        "required score filtering"
    }

    fn combine(
        &self,
        subject: &Content,
        sources: &[ScoredCandidates],
        trail: &mut AuditTrail,
    ) -> ScoredCandidates {
        let required: Vec<&ScoredCandidates> = sources
            .iter()
            .filter(|s| self.required.iter().any(|r| r == s.source()))
            .collect();
        if required.is_empty() {
            trail.append(format!(
                "no results from {}, combining unfiltered",
                self.required.join(", ")
            ));
            return self.delegate.combine(subject, sources, trail);
        }

        let all: BTreeSet<&str> = sources.iter().flat_map(|s| s.uris()).collect();
        let allowed: BTreeSet<&str> = all
            .into_iter()
            .filter(|uri| {
                required
                    .iter()
                    .any(|set| set.score_of(uri).is_some_and(|s| self.threshold.passes(s)))
            })
            .collect();

        let gated: Vec<ScoredCandidates> = sources
            .iter()
            .map(|set| {
                let mut kept = set.clone();
                kept.retain(|c| {
                    let keep = allowed.contains(c.uri());
                    if !keep {
                        trail.append(format!(
                            "{}: removed from {}, no required score {}",
                            c.uri(),
                            set.source(),
                            self.threshold
                        ));
                    }
                    keep
                });
                kept
            })
            .collect();
        self.delegate.combine(subject, &gated, trail)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use equiv_core::Score;

    use super::*;
    use crate::combining::NullScoreAwareAveragingCombiner;

    #[test]
    fn candidates_without_required_score_are_discarded() {
        let x = Arc::new(Content::brand("x", "p"));
        let y = Arc::new(Content::brand("y", "p"));
        let mut search = ScoredCandidates::new("Title Search");
        search.add(x.clone(), Score::Real(2.0));
        search.add(y.clone(), Score::Real(2.0));
        let mut title = ScoredCandidates::new("Title");
        title.add(x.clone(), Score::Real(2.0));
        title.add(y.clone(), Score::Null);

        let combiner = RequiredScoreFilteringCombiner::new(
            Box::new(NullScoreAwareAveragingCombiner::new()),
            "Title",
        );
        let subject = Content::brand("s", "q");
        let combined = combiner.combine(&subject, &[search, title], &mut AuditTrail::new());
        assert_eq!(combined.score_of("x"), Some(Score::Real(2.0)));
        assert!(!combined.contains("y"));
    }

    #[test]
    fn passes_through_when_required_source_absent() {
        let x = Arc::new(Content::brand("x", "p"));
        let mut search = ScoredCandidates::new("Title Search");
        search.add(x, Score::Real(1.0));
        let combiner = RequiredScoreFilteringCombiner::new(
            Box::new(NullScoreAwareAveragingCombiner::new()),
            "Title",
        );
        let subject = Content::brand("s", "q");
        let combined = combiner.combine(&subject, &[search], &mut AuditTrail::new());
        assert_eq!(combined.score_of("x"), Some(Score::Real(1.0)));
    }

    #[test]
    fn threshold_is_configurable() {
        let x = Arc::new(Content::brand("x", "p"));
        let mut title = ScoredCandidates::new("Title");
        title.add(x, Score::Real(1.0));
        let combiner = RequiredScoreFilteringCombiner::new(
            Box::new(NullScoreAwareAveragingCombiner::new()),
            "Title",
        )
        .with_threshold(ScoreThreshold::GreaterThan(1.0));
        let subject = Content::brand("s", "q");
        assert!(combiner
            .combine(&subject, &[title], &mut AuditTrail::new())
            .is_empty());
    }

    #[test]
    fn one_passing_required_source_is_enough() {
        let x = Arc::new(Content::brand("x", "p"));
        let y = Arc::new(Content::brand("y", "p"));
        let mut title = ScoredCandidates::new("Title");
        title.add(x.clone(), Score::Real(1.0));
        title.add(y.clone(), Score::Real(0.0));
        let mut broadcast = ScoredCandidates::new("Broadcast");
        broadcast.add(x.clone(), Score::Null);
        broadcast.add(y.clone(), Score::Real(-1.0));

        let combiner = RequiredScoreFilteringCombiner::with_sources(
            Box::new(NullScoreAwareAveragingCombiner::new()),
            vec!["Title".to_string(), "Broadcast".to_string()],
        );
        let subject = Content::brand("s", "q");
        let combined = combiner.combine(&subject, &[title, broadcast], &mut AuditTrail::new());
        assert!(combined.contains("x"));
        assert!(!combined.contains("y"));
    }
}
