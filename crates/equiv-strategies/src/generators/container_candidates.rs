use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::{IContentResolver, IEquivalenceGenerator, IEquivalenceSummaryStore};
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};

/// Proposes the children of whatever the subject's container was matched
/// against last time. Scores are `Null`: this source only widens the pool.
pub struct ContainerCandidatesItemGenerator {
    summaries: Arc<dyn IEquivalenceSummaryStore>,
    resolver: Arc<dyn IContentResolver>,
}

impl ContainerCandidatesItemGenerator {
    pub fn new(
        summaries: Arc<dyn IEquivalenceSummaryStore>,
        resolver: Arc<dyn IContentResolver>,
    ) -> Self {
        Self {
            summaries,
            resolver,
        }
    }
}

impl IEquivalenceGenerator for ContainerCandidatesItemGenerator {
    fn name(&self) -> &str {
        sources::CONTAINER_CANDIDATES
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::CONTAINER_CANDIDATES);
        let Some(container) = subject.container.as_ref() else {
            trail.append("subject has no container");
            return Ok(found);
        };

        let summaries = self.summaries.summaries_for(&[container.uri.clone()])?;
        let Some(summary) = summaries.get(&container.uri) else {
            trail.append(format!("no summary for {}", container.uri));
            return Ok(found);
        };

        let children: Vec<String> = self
            .resolver
            .resolve_uris(&summary.candidates)?
            .iter()
            .filter(|c| c.actively_published)
            .flat_map(|c| c.children.iter().cloned())
            .collect();

        for child in self.resolver.resolve_uris(&children)? {
            if child.canonical_uri == subject.canonical_uri || !child.actively_published {
                continue;
            }
            found.add(child, Score::NULL);
        }
        trail.append(format!(
            "{} children of {} container candidates",
            found.len(),
            summary.candidates.len()
        ));
        Ok(found)
    }
}
