use std::sync::Arc;

use equiv_core::candidates::{sort_by_score, ScoredCandidate};
use equiv_core::{Content, Score};
use serde::Deserialize;

use crate::InMemoryContentStore;

/// One pool member of an extraction scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateFixture {
    pub uri: String,
    #[serde(default = "default_publisher")]
    pub publisher: String,
    pub score: f64,
}

fn default_publisher() -> String {
    "bbc.co.uk".to_string()
}

/// A scored pool, the extractor to run, and the expected accepted uris.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionScenario {
    pub name: String,
    /// `all_over_or_equal`, `n_times_above_next_best` or `remove_and_combine`.
    pub extractor: String,
    #[serde(default)]
    pub parameter: f64,
    pub pool: Vec<CandidateFixture>,
    pub expected: Vec<String>,
}

impl ExtractionScenario {
    /// The pool as item candidates, sorted by score descending.
    pub fn scored_pool(&self) -> Vec<ScoredCandidate> {
        let mut pool: Vec<ScoredCandidate> = self
            .pool
            .iter()
            .map(|c| {
                ScoredCandidate::new(
                    Arc::new(Content::item(c.uri.clone(), c.publisher.as_str())),
                    Score::Real(c.score),
                )
            })
            .collect();
        sort_by_score(&mut pool);
        pool
    }
}

/// A small content catalogue for end-to-end tests.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueFixture {
    pub content: Vec<Content>,
}

impl CatalogueFixture {
    pub fn into_store(self) -> InMemoryContentStore {
        let store = InMemoryContentStore::new();
        for c in self.content {
            store.insert(c);
        }
        store
    }
}
