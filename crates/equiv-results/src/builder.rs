//! EquivalenceResultBuilder: combine → filter → extract.
//!
//! The stages are exposed separately so the updater can track which one it
//! is in; [`EquivalenceResultBuilder::build`] runs all three.

use std::collections::BTreeMap;
use std::sync::Arc;

use equiv_core::candidates::ScoredCandidate;
use equiv_core::config::ExtractionScope;
use equiv_core::constants::EMPTY_COMBINATION;
use equiv_core::models::EquivalenceResults;
use equiv_core::traits::{IEquivalenceExtractor, IEquivalenceFilter, IScoreCombiner};
use equiv_core::{AuditTrail, Content, Publisher, ScoredCandidates};
use tracing::debug;

pub struct EquivalenceResultBuilder {
    combiner: Box<dyn IScoreCombiner>,
    filter: Box<dyn IEquivalenceFilter>,
    extractor: Box<dyn IEquivalenceExtractor>,
    scope: ExtractionScope,
}

impl EquivalenceResultBuilder {
    pub fn new(
        combiner: Box<dyn IScoreCombiner>,
        filter: Box<dyn IEquivalenceFilter>,
        extractor: Box<dyn IEquivalenceExtractor>,
    ) -> Self {
        Self {
            combiner,
            filter,
            extractor,
            scope: ExtractionScope::PerPublisher,
        }
    }

    pub fn with_scope(mut self, scope: ExtractionScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn combine(
        &self,
        subject: &Content,
        raw_scores: &[ScoredCandidates],
        trail: &mut AuditTrail,
    ) -> ScoredCandidates {
        trail.start_stage(format!("Combining ({})", self.combiner.name()));
        let combined = if raw_scores.is_empty() {
            trail.append("nothing to combine");
            ScoredCandidates::new(EMPTY_COMBINATION)
        } else {
            self.combiner.combine(subject, raw_scores, trail)
        };
        trail.finish_stage();
        debug!(subject = %subject.canonical_uri, combined = combined.len(), "combined scores");
        combined
    }

    /// Filtered pool, sorted by score descending.
    pub fn filter(
        &self,
        subject: &Content,
        combined: &ScoredCandidates,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        trail.start_stage("Filtering");
        let filtered = self.filter.apply(combined.ordered(), subject, trail);
        trail.append(format!("{} of {} candidates remain", filtered.len(), combined.len()));
        trail.finish_stage();
        filtered
    }

    /// Accepted candidates per publisher. Publishers with nothing accepted are absent.
    pub fn extract(
        &self,
        subject: &Content,
        filtered: &[ScoredCandidate],
        trail: &mut AuditTrail,
    ) -> BTreeMap<Publisher, Vec<ScoredCandidate>> {
        trail.start_stage(format!("Extracting ({})", self.extractor.name()));
        let mut accepted: BTreeMap<Publisher, Vec<ScoredCandidate>> = BTreeMap::new();
        match self.scope {
            ExtractionScope::PerPublisher => {
                for (publisher, bin) in bin_by_publisher(filtered) {
                    trail.start_stage(publisher.key().to_string());
                    let chosen = self.extractor.extract(&bin, subject, trail);
                    trail.finish_stage();
                    if !chosen.is_empty() {
                        accepted.insert(publisher, chosen);
                    }
                }
            }
            ExtractionScope::WholePool => {
                let chosen = self.extractor.extract(filtered, subject, trail);
                for (publisher, bin) in bin_by_publisher(&chosen) {
                    accepted.insert(publisher, bin);
                }
            }
        }
        trail.finish_stage();
        accepted
    }

    pub fn build(
        &self,
        subject: Arc<Content>,
        raw_scores: Vec<ScoredCandidates>,
        mut trail: AuditTrail,
    ) -> EquivalenceResults {
        let combined = self.combine(&subject, &raw_scores, &mut trail);
        let filtered = self.filter(&subject, &combined, &mut trail);
        let accepted = self.extract(&subject, &filtered, &mut trail);
        EquivalenceResults {
            subject,
            raw_scores,
            combined,
            accepted,
            trail: trail.finish(),
        }
    }
}

/// Group a sorted pool by candidate publisher, keeping the order inside each bin.
fn bin_by_publisher(candidates: &[ScoredCandidate]) -> BTreeMap<Publisher, Vec<ScoredCandidate>> {
    let mut bins: BTreeMap<Publisher, Vec<ScoredCandidate>> = BTreeMap::new();
    for c in candidates {
        bins.entry(c.publisher().clone()).or_default().push(c.clone());
    }
    bins
}

#[cfg(test)]
mod tests {
    use equiv_core::Score;

    use super::*;
    use crate::combining::NullScoreAwareAveragingCombiner;
    use crate::extraction::NTimesAboveNextBestExtractor;
    use crate::filtering::{ConjunctiveFilter, MinimumScoreFilter};

    fn builder(scope: ExtractionScope) -> EquivalenceResultBuilder {
        EquivalenceResultBuilder::new(
            Box::new(NullScoreAwareAveragingCombiner::new()),
            Box::new(ConjunctiveFilter::new(vec![Box::new(MinimumScoreFilter::new(0.25))])),
            Box::new(NTimesAboveNextBestExtractor::new(1.5)),
        )
        .with_scope(scope)
    }

    fn raw() -> Vec<ScoredCandidates> {
        let mut title = ScoredCandidates::new("Title");
        title.add(Arc::new(Content::item("bbc-1", "bbc")), Score::Real(2.0));
        title.add(Arc::new(Content::item("itv-1", "itv")), Score::Real(1.8));
        title.add(Arc::new(Content::item("itv-2", "itv")), Score::Real(0.1));
        vec![title]
    }

    #[test]
    fn extraction_runs_per_publisher_by_default() {
        let results = builder(ExtractionScope::PerPublisher).build(
            Arc::new(Content::item("s", "pa")),
            raw(),
            AuditTrail::new(),
        );
        let mut uris = results.accepted_uris();
        uris.sort();
        assert_eq!(uris, vec!["bbc-1", "itv-1"]);
    }

    #[test]
    fn whole_pool_extraction_compares_across_publishers() {
        let results = builder(ExtractionScope::WholePool).build(
            Arc::new(Content::item("s", "pa")),
            raw(),
            AuditTrail::new(),
        );
        assert!(!results.has_accepted());
    }

    #[test]
    fn empty_input_gives_empty_combination() {
        let results = builder(ExtractionScope::PerPublisher).build(
            Arc::new(Content::item("s", "pa")),
            Vec::new(),
            AuditTrail::new(),
        );
        assert_eq!(results.combined.source(), EMPTY_COMBINATION);
        assert!(results.accepted.is_empty());
    }
}
