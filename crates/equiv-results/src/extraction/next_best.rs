use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceExtractor;
use equiv_core::{AuditTrail, Content};

use super::{top_score, uris};

/// Accepts the top scorer(s) only when they beat the next distinct score by
/// a factor of `n`. A pool with a single distinct score accepts its ties.
#[derive(Debug, Clone, Copy)]
pub struct NTimesAboveNextBestExtractor {
    n: f64,
}

impl NTimesAboveNextBestExtractor {
    pub fn new(n: f64) -> Self {
        Self { n }
    }
}

impl IEquivalenceExtractor for NTimesAboveNextBestExtractor {
    fn name(&self) -> &str {
        "n times above next best"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        _subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let Some(top) = top_score(candidates).filter(|t| *t > 0.0) else {
            trail.append(format!("{}: no positive top score", self.name()));
            return Vec::new();
        };
        let leaders: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.score.as_f64() == Some(top))
            .cloned()
            .collect();
        let next = candidates
            .iter()
            .filter_map(|c| c.score.as_f64())
            .filter(|s| *s < top)
            .reduce(f64::max);

        match next {
            Some(next) if top < self.n * next => {
                trail.append(format!(
                    "{}: top {top:.2} not {}x next {next:.2}",
                    self.name(),
                    self.n
                ));
                Vec::new()
            }
            _ => {
                trail.append(format!("{}: [{}]", self.name(), uris(&leaders)));
                leaders
            }
        }
    }
}
