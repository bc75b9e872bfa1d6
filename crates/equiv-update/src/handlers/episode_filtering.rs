use std::sync::Arc;

use equiv_core::config::HierarchyMode;
use equiv_core::models::{EquivalenceResults, HandleOutcome};
use equiv_core::traits::{IEquivalenceSummaryStore, IResultHandler};
use equiv_core::EquivResult;
use equiv_results::filtering::container_consistent;
use tracing::debug;

/// Drops accepted episodes whose container disagrees with the subject
/// container's equivalents, then hands the rest to `delegate`.
///
/// An episode whose container has no summary yet cannot be checked; the run
/// ends as dependency-missing and nothing is written.
pub struct EpisodeFilteringHandler {
    delegate: Box<dyn IResultHandler>,
    summaries: Arc<dyn IEquivalenceSummaryStore>,
    mode: HierarchyMode,
}

impl EpisodeFilteringHandler {
    pub fn new(
        delegate: Box<dyn IResultHandler>,
        summaries: Arc<dyn IEquivalenceSummaryStore>,
        mode: HierarchyMode,
    ) -> Self {
        Self {
            delegate,
            summaries,
            mode,
        }
    }

    pub fn strict(delegate: Box<dyn IResultHandler>, summaries: Arc<dyn IEquivalenceSummaryStore>) -> Self {
        Self::new(delegate, summaries, HierarchyMode::Strict)
    }

    pub fn relaxed(delegate: Box<dyn IResultHandler>, summaries: Arc<dyn IEquivalenceSummaryStore>) -> Self {
        Self::new(delegate, summaries, HierarchyMode::Relaxed)
    }
}

impl IResultHandler for EpisodeFilteringHandler {
    fn name(&self) -> &str {
        "episode parent filter"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        let subject = &results.subject;
        let container = match subject.container.as_ref() {
            Some(container) if !subject.shape.is_container() => container,
            _ => return self.delegate.handle(results),
        };

        let summary = self
            .summaries
            .summaries_for(&[container.uri.clone()])?
            .remove(&container.uri);
        let Some(summary) = summary else {
            debug!(subject = %subject.canonical_uri, container = %container.uri, "container summary missing");
            return Ok(HandleOutcome::DependencyMissing {
                container_uri: container.uri.clone(),
            });
        };

        let mut filtered = results.clone();
        let mut removed = Vec::new();
        for candidates in filtered.accepted.values_mut() {
            candidates.retain(|c| {
                let keep = container_consistent(self.mode, &summary, &c.candidate);
                if !keep {
                    let parent = c.candidate.container.as_ref().map_or("-", |p| p.uri.as_str());
                    removed.push(format!("{} removed. Unacceptable container: {parent}", c.uri()));
                }
                keep
            });
        }
        filtered.accepted.retain(|_, candidates| !candidates.is_empty());

        filtered.trail.start_stage("Episode parent filter");
        for note in removed {
            filtered.trail.append(note);
        }
        filtered.trail.finish_stage();

        self.delegate.handle(&filtered)
    }
}
