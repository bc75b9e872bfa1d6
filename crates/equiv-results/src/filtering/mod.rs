//! Candidate filters. Each predicate is independent; [`ConjunctiveFilter`]
//! keeps a candidate only when every predicate accepts it, so order only
//! affects which rejection reason gets recorded.

mod content_type;
mod exclusion;
mod hierarchy;
mod score;

pub use content_type::{FilmYearFilter, MediaTypeFilter, SpecializationFilter};
pub use exclusion::{ExclusionListFilter, PlaceholderFilter, PublisherFilter, UnpublishedContentFilter};
pub use hierarchy::{container_consistent, ContainerHierarchyFilter};
pub use score::MinimumScoreFilter;

use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceFilter;
use equiv_core::{AuditTrail, Content};

/// All predicates must accept.
pub struct ConjunctiveFilter {
    filters: Vec<Box<dyn IEquivalenceFilter>>,
}

impl ConjunctiveFilter {
    pub fn new(filters: Vec<Box<dyn IEquivalenceFilter>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl IEquivalenceFilter for ConjunctiveFilter {
    fn name(&self) -> &str {
        "conjunctive"
    }

    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool {
        self.filters
            .iter()
            .all(|f| f.accepts(candidate, subject, trail))
    }

    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        self.filters
            .iter()
            .fold(candidates, |remaining, f| f.apply(remaining, subject, trail))
    }
}

/// Record a rejection in the standard format.
pub(crate) fn reject(trail: &mut AuditTrail, candidate: &ScoredCandidate, filter: &str, why: &str) {
    trail.append(format!("{} removed by {filter}: {why}", candidate.uri()));
}
