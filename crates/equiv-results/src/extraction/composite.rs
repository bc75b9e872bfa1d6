use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceExtractor;
use equiv_core::{AuditTrail, Content};

/// Tries each extractor in turn and returns the first non-empty result.
pub struct ContinueUntilOneWorksExtractor {
    extractors: Vec<Box<dyn IEquivalenceExtractor>>,
}

impl ContinueUntilOneWorksExtractor {
    pub fn new(extractors: Vec<Box<dyn IEquivalenceExtractor>>) -> Self {
        Self { extractors }
    }
}

impl IEquivalenceExtractor for ContinueUntilOneWorksExtractor {
    fn name(&self) -> &str {
        "continue until one works"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        for extractor in &self.extractors {
            let accepted = extractor.extract(candidates, subject, trail);
            if !accepted.is_empty() {
                return accepted;
            }
        }
        Vec::new()
    }
}

/// Runs `first`, then `second` on whatever `first` left behind, and returns
/// the union in pool order.
pub struct RemoveAndCombineExtractor {
    first: Box<dyn IEquivalenceExtractor>,
    second: Box<dyn IEquivalenceExtractor>,
}

impl RemoveAndCombineExtractor {
    pub fn new(first: Box<dyn IEquivalenceExtractor>, second: Box<dyn IEquivalenceExtractor>) -> Self {
        Self { first, second }
    }
}

impl IEquivalenceExtractor for RemoveAndCombineExtractor {
    fn name(&self) -> &str {
        "remove and combine"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let first = self.first.extract(candidates, subject, trail);
        let remaining: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| !first.iter().any(|a| a.uri() == c.uri()))
            .cloned()
            .collect();
        let second = self.second.extract(&remaining, subject, trail);
        candidates
            .iter()
            .filter(|c| {
                first.iter().any(|a| a.uri() == c.uri()) || second.iter().any(|a| a.uri() == c.uri())
            })
            .cloned()
            .collect()
    }
}
