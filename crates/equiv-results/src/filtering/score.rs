use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceFilter;
use equiv_core::{AuditTrail, Content};

use super::reject;

/// Rejects candidates whose combined score is `Null` or below `minimum`.
#[derive(Debug, Clone, Copy)]
pub struct MinimumScoreFilter {
    minimum: f64,
}

impl MinimumScoreFilter {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl IEquivalenceFilter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "minimum score"
    }

    fn accepts(&self, candidate: &ScoredCandidate, _subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = candidate.score.as_f64().is_some_and(|s| s >= self.minimum);
        if !passes {
            reject(
                trail,
                candidate,
                self.name(),
                &format!("{} below {}", candidate.score, self.minimum),
            );
        }
        passes
    }
}
