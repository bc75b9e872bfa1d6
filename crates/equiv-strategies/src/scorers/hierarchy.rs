use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::{IContentResolver, IEquivalenceScorer};
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};

/// Episode counts may differ by this much and still agree.
const SIZE_TOLERANCE: usize = 1;

/// Compares the shape of two containers' hierarchies.
///
/// Brands with series compare their series sizes, sorted; flat containers
/// compare their episode counts.
pub struct ContainerHierarchyScorer {
    resolver: Arc<dyn IContentResolver>,
    mismatch_score: Score,
}

/// Shape of a container's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Structure {
    Series(Vec<usize>),
    Flat(usize),
    Empty,
}

impl ContainerHierarchyScorer {
    pub fn new(resolver: Arc<dyn IContentResolver>) -> Self {
        Self {
            resolver,
            mismatch_score: Score::NULL,
        }
    }

    pub fn with_mismatch_score(mut self, score: Score) -> Self {
        self.mismatch_score = score;
        self
    }

    fn structure(&self, container: &Content) -> EquivResult<Structure> {
        if !container.series_refs.is_empty() {
            let mut sizes: Vec<usize> = self
                .resolver
                .resolve_uris(&container.series_refs)?
                .iter()
                .map(|s| s.children.len())
                .collect();
            if !sizes.is_empty() {
                sizes.sort_unstable();
                return Ok(Structure::Series(sizes));
            }
        }
        Ok(match container.children.len() {
            0 => Structure::Empty,
            n => Structure::Flat(n),
        })
    }

    fn compare(&self, subject: &Structure, candidate: &Structure) -> Score {
        let agree = match (subject, candidate) {
            (Structure::Series(a), Structure::Series(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.abs_diff(*y) <= SIZE_TOLERANCE)
            }
            (Structure::Flat(a), Structure::Flat(b)) => a.abs_diff(*b) <= SIZE_TOLERANCE,
            (_, Structure::Empty) => return Score::NULL,
            _ => false,
        };
        if agree {
            Score::ONE
        } else {
            self.mismatch_score
        }
    }
}

impl IEquivalenceScorer for ContainerHierarchyScorer {
    fn name(&self) -> &str {
        sources::HIERARCHY
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::HIERARCHY);
        let own = self.structure(subject)?;
        if own == Structure::Empty {
            trail.append("subject has no children");
            for candidate in candidates {
                scored.add(Arc::clone(candidate), Score::NULL);
            }
            return Ok(scored);
        }

        for candidate in candidates {
            let theirs = self.structure(candidate)?;
            let score = self.compare(&own, &theirs);
            trail.append(format!("{} scored {}", candidate.canonical_uri, score));
            scored.add(Arc::clone(candidate), score);
        }
        Ok(scored)
    }
}
