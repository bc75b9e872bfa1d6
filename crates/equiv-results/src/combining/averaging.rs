use equiv_core::constants::{COMBINED, EMPTY_COMBINATION};
use equiv_core::traits::IScoreCombiner;
use equiv_core::{AuditTrail, Content, Score, ScoredCandidates};

use super::scores_by_candidate;

/// Mean of each candidate's real scores.
///
/// Abstentions (`Null`) are left out of both numerator and denominator, so a
/// source that had nothing to say never drags a candidate towards zero.
/// Candidates with no real score at all are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScoreAwareAveragingCombiner {
    zero_sole_source: bool,
}

impl NullScoreAwareAveragingCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give 0 to candidates only one source scored when several sources ran.
    pub fn zeroing_sole_source_scores() -> Self {
        Self {
            zero_sole_source: true,
        }
    }
}

impl IScoreCombiner for NullScoreAwareAveragingCombiner {
    fn name(&self) -> &str {
        "null-aware averaging"
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
            let reals: Vec<f64> = scores.iter().filter_map(Score::as_f64).collect();
            if reals.is_empty() {
                trail.append(format!("{uri}: dropped, no source scored it"));
                continue;
            }
            let score = if self.zero_sole_source && reals.len() == 1 && sources.len() > 1 {
                trail.append(format!("{uri}: only one source scored it"));
                Score::ZERO
            } else {
                Score::value(reals.iter().sum::<f64>() / reals.len() as f64)
            };
            trail.append(format!("{uri}: {score} over {} scores", reals.len()));
            combined.add(candidate, score);
        }
        combined
    }
}
