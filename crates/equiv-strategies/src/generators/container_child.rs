use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::{IContentResolver, IEquivalenceGenerator, IEquivalenceSummaryStore};
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};
use tracing::debug;

/// Propagates item equivalence up to containers.
///
/// Each of the subject's children votes once for every parent among its
/// equivalents. A parent scores `min(1, votes / children)`.
pub struct ContainerChildGenerator {
    summaries: Arc<dyn IEquivalenceSummaryStore>,
    resolver: Arc<dyn IContentResolver>,
}

impl ContainerChildGenerator {
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

impl IEquivalenceGenerator for ContainerChildGenerator {
    fn name(&self) -> &str {
        sources::CONTAINER_CHILD
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::CONTAINER_CHILD);
        if !subject.shape.is_container() || subject.children.is_empty() {
            trail.append("no children to propagate from");
            return Ok(found);
        }

        let children = subject.children.len();
        let summaries = self.summaries.summaries_for(&subject.children)?;
        let mut votes: BTreeMap<String, usize> = BTreeMap::new();
        for summary in summaries.values() {
            let parents: BTreeSet<&String> = summary
                .all_equivalents()
                .filter_map(|equivalent| equivalent.parent.as_ref())
                .filter(|parent| **parent != subject.canonical_uri)
                .collect();
            for parent in parents {
                *votes.entry(parent.clone()).or_default() += 1;
            }
        }
        if votes.is_empty() {
            trail.append(format!("no equivalents among {children} children"));
            return Ok(found);
        }

        let parents: Vec<String> = votes.keys().cloned().collect();
        for parent in self.resolver.resolve_uris(&parents)? {
            if !parent.actively_published || !parent.shape.is_container() {
                continue;
            }
            let count = votes.get(&parent.canonical_uri).copied().unwrap_or(0);
            let score = Score::value((count as f64 / children as f64).min(1.0));
            trail.append(format!(
                "{}: {count} of {children} children equivalent",
                parent.canonical_uri
            ));
            found.add(parent, score);
        }
        debug!(
            subject = %subject.canonical_uri,
            children,
            candidates = found.len(),
            "container child propagation"
        );
        Ok(found)
    }
}
