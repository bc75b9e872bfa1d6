//! Score combiners: many per-source sets in, one combined set out.

mod additive;
mod averaging;
mod required_score;

pub use additive::AdditiveCombiner;
pub use averaging::NullScoreAwareAveragingCombiner;
pub use required_score::RequiredScoreFilteringCombiner;

use std::collections::BTreeMap;
use std::sync::Arc;

use equiv_core::{Content, Score, ScoredCandidates};

/// Every candidate across `sources` with the scores each source gave it, in source order.
pub(crate) fn scores_by_candidate(
    sources: &[ScoredCandidates],
) -> BTreeMap<String, (Arc<Content>, Vec<Score>)> {
    let mut by_candidate: BTreeMap<String, (Arc<Content>, Vec<Score>)> = BTreeMap::new();
    for source in sources {
        for scored in source.iter() {
            by_candidate
                .entry(scored.uri().to_string())
                .or_insert_with(|| (scored.candidate.clone(), Vec::new()))
                .1
                .push(scored.score);
        }
    }
    by_candidate
}
