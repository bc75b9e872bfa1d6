use std::sync::Arc;

use crate::candidates::{ScoredCandidate, ScoredCandidates};
use crate::content::Content;
use crate::description::AuditTrail;
use crate::errors::EquivResult;
use crate::models::{EquivalenceResults, HandleOutcome};

/// Proposes candidates for a subject. Read-only with respect to the graph.
pub trait IEquivalenceGenerator: Send + Sync {
    /// Stable source name stamped on the output.
    fn name(&self) -> &str;

    /// Propose candidates. An error means the source abstains for this subject.
    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates>;
}

/// Scores already-proposed candidates.
pub trait IEquivalenceScorer: Send + Sync {
    fn name(&self) -> &str;

    /// Score `candidates`. An error means the source abstains for this subject.
    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates>;
}

/// Merges per-source sets into one combined set.
pub trait IScoreCombiner: Send + Sync {
    fn name(&self) -> &str;

    fn combine(
        &self,
        subject: &Content,
        sources: &[ScoredCandidates],
        trail: &mut AuditTrail,
    ) -> ScoredCandidates;
}

/// One predicate of the conjunctive filter.
pub trait IEquivalenceFilter: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `candidate` survives. Rejections should say why in `trail`.
    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool;

    /// Keep the candidates this filter accepts, preserving order.
    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .filter(|c| self.accepts(c, subject, trail))
            .collect()
    }
}

/// Chooses the accepted subset of a filtered pool.
pub trait IEquivalenceExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// `candidates` usually arrive sorted by score descending, but
    /// implementations must not rely on it. The result is a subset.
    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate>;
}

/// Side-effecting consumer of a finished result.
pub trait IResultHandler: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome>;
}
