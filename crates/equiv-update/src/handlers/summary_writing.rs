use std::collections::BTreeSet;
use std::sync::Arc;

use equiv_core::models::{EquivalenceResults, EquivalenceSummary, HandleOutcome, SummaryRef};
use equiv_core::traits::{IEquivalenceSummaryStore, IResultHandler};
use equiv_core::EquivResult;

/// Records what the run considered and accepted, for hierarchy-aware
/// strategies that run later on parents and children.
pub struct SummaryWritingHandler {
    summaries: Arc<dyn IEquivalenceSummaryStore>,
}

impl SummaryWritingHandler {
    pub fn new(summaries: Arc<dyn IEquivalenceSummaryStore>) -> Self {
        Self { summaries }
    }

    pub fn summarise(results: &EquivalenceResults) -> EquivalenceSummary {
        let subject = &results.subject;
        let mut summary = EquivalenceSummary::new(
            subject.canonical_uri.clone(),
            subject.container.as_ref().map(|c| c.uri.clone()),
        );
        let candidates: BTreeSet<&str> = results.raw_scores.iter().flat_map(|s| s.uris()).collect();
        summary.candidates = candidates.into_iter().map(str::to_string).collect();
        for (publisher, accepted) in &results.accepted {
            summary.equivalents.insert(
                publisher.clone(),
                accepted
                    .iter()
                    .map(|c| SummaryRef {
                        uri: c.uri().to_string(),
                        id: c.candidate.id,
                        publisher: publisher.clone(),
                        parent: c.candidate.container.as_ref().map(|p| p.uri.clone()),
                    })
                    .collect(),
            );
        }
        summary
    }
}

impl IResultHandler for SummaryWritingHandler {
    fn name(&self) -> &str {
        "summary writer"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        self.summaries.store(Self::summarise(results))?;
        Ok(HandleOutcome::unchanged())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use equiv_core::candidates::ScoredCandidate;
    use equiv_core::{AuditTrail, Content, Publisher, Score, ScoredCandidates};

    use super::*;

    #[test]
    fn summary_lists_every_raw_candidate_and_the_accepted_parents() {
        let accepted = Arc::new(Content::item("bbc-ep", "bbc").with_container("bbc-brand"));
        let rejected = Arc::new(Content::item("bbc-other", "bbc"));
        let mut title = ScoredCandidates::new("Title");
        title.add(accepted.clone(), Score::ONE);
        title.add(rejected, Score::NULL);
        let results = EquivalenceResults {
            subject: Arc::new(Content::item("pa-ep", "pa").with_container("pa-brand")),
            raw_scores: vec![title],
            combined: ScoredCandidates::new("combined"),
            accepted: BTreeMap::from([(
                Publisher::new("bbc"),
                vec![ScoredCandidate::new(accepted, Score::ONE)],
            )]),
            trail: AuditTrail::new(),
        };

        let summary = SummaryWritingHandler::summarise(&results);
        assert_eq!(summary.parent.as_deref(), Some("pa-brand"));
        assert_eq!(summary.candidates, vec!["bbc-ep", "bbc-other"]);
        let refs = summary.equivalents_for(&Publisher::new("bbc"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].parent.as_deref(), Some("bbc-brand"));
    }
}
