//! Extractors choose the accepted subset of a filtered pool.
//!
//! The builder hands pools over sorted by score, but no extractor depends on
//! that order. No extractor ever returns a candidate that was not in its
//! input. Ties are resolved by inclusion.

mod composite;
mod high_score;
mod multiple;
mod next_best;
mod threshold;

pub use composite::{ContinueUntilOneWorksExtractor, RemoveAndCombineExtractor};
pub use high_score::SameHighScoreAndPublisherExtractor;
pub use multiple::MultipleCandidateExtractor;
pub use next_best::NTimesAboveNextBestExtractor;
pub use threshold::{AllOverOrEqualThresholdExtractor, PercentAboveMaxExtractor};

use equiv_core::candidates::ScoredCandidate;

/// Highest real score in the pool.
pub(crate) fn top_score(candidates: &[ScoredCandidate]) -> Option<f64> {
    candidates.iter().filter_map(|c| c.score.as_f64()).reduce(f64::max)
}

pub(crate) fn uris(candidates: &[ScoredCandidate]) -> String {
    candidates
        .iter()
        .map(|c| c.uri())
        .collect::<Vec<_>>()
        .join(", ")
}
