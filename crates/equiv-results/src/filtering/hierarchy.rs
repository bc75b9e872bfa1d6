use std::sync::Arc;

use equiv_core::candidates::ScoredCandidate;
use equiv_core::config::HierarchyMode;
use equiv_core::models::EquivalenceSummary;
use equiv_core::traits::{IEquivalenceFilter, IEquivalenceSummaryStore};
use equiv_core::{AuditTrail, Content};
use tracing::warn;

use super::reject;

/// Whether `candidate`'s container agrees with what the subject's container
/// was equivalated to. Candidates without a container always agree.
pub fn container_consistent(
    mode: HierarchyMode,
    container_summary: &EquivalenceSummary,
    candidate: &Content,
) -> bool {
    let Some(candidate_container) = candidate.container.as_ref() else {
        return true;
    };
    let equivalents = container_summary.equivalents_for(&candidate.publisher);
    if equivalents.is_empty() {
        return mode == HierarchyMode::Relaxed;
    }
    equivalents.iter().any(|e| e.uri == candidate_container.uri)
}

/// Rejects episode candidates whose container is not an equivalent of the
/// subject's container. A container without a summary yet rejects nothing;
/// the episode-filtering handler deals with that case.
pub struct ContainerHierarchyFilter {
    summaries: Arc<dyn IEquivalenceSummaryStore>,
    mode: HierarchyMode,
}

impl ContainerHierarchyFilter {
    pub fn new(summaries: Arc<dyn IEquivalenceSummaryStore>, mode: HierarchyMode) -> Self {
        Self { summaries, mode }
    }

    fn container_summary(&self, subject: &Content) -> Option<EquivalenceSummary> {
        if subject.shape.is_container() {
            return None;
        }
        let container = subject.container.as_ref()?;
        match self.summaries.summaries_for(&[container.uri.clone()]) {
            Ok(mut found) => found.remove(&container.uri),
            Err(e) => {
                warn!(subject = %subject.canonical_uri, error = %e, "container summary unavailable");
                None
            }
        }
    }

    fn check(
        &self,
        summary: Option<&EquivalenceSummary>,
        candidate: &ScoredCandidate,
        trail: &mut AuditTrail,
    ) -> bool {
        let Some(summary) = summary else {
            return true;
        };
        let passes = container_consistent(self.mode, summary, &candidate.candidate);
        if !passes {
            reject(
                trail,
                candidate,
                self.name(),
                &format!("container not equivalent to {}", summary.subject),
            );
        }
        passes
    }
}

impl IEquivalenceFilter for ContainerHierarchyFilter {
    fn name(&self) -> &str {
        "container hierarchy"
    }

    fn accepts(&self, candidate: &ScoredCandidate, subject: &Content, trail: &mut AuditTrail) -> bool {
        let summary = self.container_summary(subject);
        self.check(summary.as_ref(), candidate, trail)
    }

    fn apply(
        &self,
        candidates: Vec<ScoredCandidate>,
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let summary = self.container_summary(subject);
        candidates
            .into_iter()
            .filter(|c| self.check(summary.as_ref(), c, trail))
            .collect()
    }
}
