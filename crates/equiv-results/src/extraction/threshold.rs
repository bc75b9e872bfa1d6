use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceExtractor;
use equiv_core::{AuditTrail, Content};

use super::{top_score, uris};

/// Every candidate scoring at least `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AllOverOrEqualThresholdExtractor {
    threshold: f64,
}

impl AllOverOrEqualThresholdExtractor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl IEquivalenceExtractor for AllOverOrEqualThresholdExtractor {
    fn name(&self) -> &str {
        "all over or equal threshold"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        _subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let accepted: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.score.as_f64().is_some_and(|s| s >= self.threshold))
            .cloned()
            .collect();
        trail.append(format!(
            "{} >= {}: [{}]",
            self.name(),
            self.threshold,
            uris(&accepted)
        ));
        accepted
    }
}

/// Candidates scoring more than `fraction` of the pool maximum.
#[derive(Debug, Clone, Copy)]
pub struct PercentAboveMaxExtractor {
    fraction: f64,
}

impl PercentAboveMaxExtractor {
    /// `fraction` of the maximum, e.g. `0.9` for 90%.
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }
}

impl IEquivalenceExtractor for PercentAboveMaxExtractor {
    fn name(&self) -> &str {
        "percent above max"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        _subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let Some(max) = top_score(candidates).filter(|m| *m > 0.0) else {
            trail.append(format!("{}: no positive maximum", self.name()));
            return Vec::new();
        };
        let floor = max * self.fraction;
        let accepted: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.score.as_f64().is_some_and(|s| s > floor))
            .cloned()
            .collect();
        trail.append(format!("{} > {floor:.2}: [{}]", self.name(), uris(&accepted)));
        accepted
    }
}
