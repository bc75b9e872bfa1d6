use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use equiv_core::models::{EquivalenceResults, EquivalenceSummary, HandleOutcome};
use equiv_core::traits::{IContentResolver, IEquivalenceSummaryStore, ILookupEntryStore, ILookupWriter, IResultHandler};
use equiv_core::{Content, ContentShape, EquivResult, LookupRef, Publisher};
use tracing::info;

/// Links the episodes of an equivalated container to the episodes of its
/// equivalents when series and episode numbers agree.
///
/// Only publishers for which the episode has no accepted equivalent yet are
/// filled in. Re-running the episode on its own drops these links again
/// until the container runs.
pub struct EpisodeMatchingHandler {
    content: Arc<dyn IContentResolver>,
    summaries: Arc<dyn IEquivalenceSummaryStore>,
    lookups: Arc<dyn ILookupEntryStore>,
    writer: Arc<dyn ILookupWriter>,
    publishers: BTreeSet<Publisher>,
}

impl EpisodeMatchingHandler {
    pub fn new(
        content: Arc<dyn IContentResolver>,
        summaries: Arc<dyn IEquivalenceSummaryStore>,
        lookups: Arc<dyn ILookupEntryStore>,
        writer: Arc<dyn ILookupWriter>,
        publishers: impl IntoIterator<Item = Publisher>,
    ) -> Self {
        Self {
            content,
            summaries,
            lookups,
            writer,
            publishers: publishers.into_iter().collect(),
        }
    }

    fn episodes_of(&self, container: &Content) -> EquivResult<Vec<Arc<Content>>> {
        Ok(self
            .content
            .resolve_uris(&container.children)?
            .into_iter()
            .filter(|c| c.shape == ContentShape::Item)
            .collect())
    }

    fn stitch(
        &self,
        episode: &Content,
        summary: &EquivalenceSummary,
        candidates: &[Arc<Content>],
    ) -> EquivResult<bool> {
        let mut additional: Vec<&Content> = Vec::new();
        let mut filled: BTreeSet<&Publisher> = BTreeSet::new();
        for candidate in candidates {
            if !same_position(episode, candidate) || filled.contains(&candidate.publisher) {
                continue;
            }
            if !summary.equivalents_for(&candidate.publisher).is_empty() {
                continue;
            }
            info!(episode = %episode.canonical_uri, equivalent = %candidate.canonical_uri, "adding equivalent by sequence");
            filled.insert(&candidate.publisher);
            additional.push(candidate.as_ref());
        }
        if additional.is_empty() {
            return Ok(false);
        }

        let existing: Vec<String> = summary.all_equivalents().map(|r| r.uri.clone()).collect();
        let mut refs: Vec<LookupRef> = self
            .lookups
            .entries_for_uris(&existing)?
            .into_iter()
            .map(|e| e.self_ref)
            .collect();
        for candidate in additional {
            refs.push(self.lookups.ensure_lookup(candidate)?.self_ref);
        }
        let subject = self.lookups.ensure_lookup(episode)?;
        Ok(self
            .writer
            .write_lookup(&subject.self_ref, &refs, &self.publishers)?
            .is_some())
    }
}

fn same_position(a: &Content, b: &Content) -> bool {
    a.episode_number.is_some()
        && a.episode_number == b.episode_number
        && a.series_number.is_some()
        && a.series_number == b.series_number
}

impl IResultHandler for EpisodeMatchingHandler {
    fn name(&self) -> &str {
        "episode matcher"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        if !results.subject.shape.is_container() || !results.has_accepted() {
            return Ok(HandleOutcome::unchanged());
        }

        let mut candidates: Vec<Arc<Content>> = Vec::new();
        for equivalent in results.accepted_candidates() {
            candidates.extend(self.episodes_of(&equivalent.candidate)?);
        }
        let episodes = self.episodes_of(&results.subject)?;
        let uris: Vec<String> = episodes.iter().map(|e| e.canonical_uri.clone()).collect();
        let summaries: BTreeMap<String, EquivalenceSummary> = self.summaries.summaries_for(&uris)?;

        let mut changed = false;
        for episode in &episodes {
            if let Some(summary) = summaries.get(&episode.canonical_uri) {
                changed |= self.stitch(episode, summary, &candidates)?;
            }
        }
        Ok(HandleOutcome::changed(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_needs_both_numbers() {
        let a = Content::item("a", "pa").with_series("s", Some(1)).with_episode_number(2);
        let b = Content::item("b", "bbc").with_series("t", Some(1)).with_episode_number(2);
        let no_series = Content::item("c", "bbc").with_episode_number(2);
        assert!(same_position(&a, &b));
        assert!(!same_position(&a, &no_series));
        assert!(!same_position(&no_series, &no_series));
    }
}
