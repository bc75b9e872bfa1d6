use equiv_core::constants::{COMBINED, EMPTY_COMBINATION};
use equiv_core::traits::IScoreCombiner;
use equiv_core::{AuditTrail, Content, Score, ScoredCandidates};

use super::scores_by_candidate;

/// Sums every source's real score; a candidate no source scored stays `Null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdditiveCombiner;

impl AdditiveCombiner {
    pub fn new() -> Self {
        Self
    }
}

impl IScoreCombiner for AdditiveCombiner {
    fn name(&self) -> &str {
        "additive"
    }

    fn combine(
        &self,
        _subject: &Content,
        sources: &[ScoredCandidates],
        trail: &mut AuditTrail,
    ) -> ScoredCandidates {
        if sources.is_empty() {
            return ScoredCandidates::new(EMPTY_COMBINATION);
        }
        let mut combined = ScoredCandidates::new(COMBINED);
        for (uri, (candidate, scores)) in scores_by_candidate(sources) {
            let total = scores.into_iter().fold(Score::Null, |acc, s| acc + s);
            trail.append(format!("{uri}: {total}"));
            combined.add(candidate, total);
        }
        combined
    }
}
