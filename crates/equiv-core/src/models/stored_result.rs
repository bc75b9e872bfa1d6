use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EquivalenceResults;
use crate::score::Score;

/// Audit record of one run, as persisted and shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEquivalenceResult {
    pub subject_uri: String,
    #[serde(default)]
    pub subject_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    pub publisher: String,
    /// source → candidate uri → score.
    pub source_scores: BTreeMap<String, BTreeMap<String, Score>>,
    pub combined: BTreeMap<String, Score>,
    /// publisher → accepted uris.
    pub accepted: BTreeMap<String, Vec<String>>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredEquivalenceResult {
    pub fn from_results(results: &EquivalenceResults, now: DateTime<Utc>) -> Self {
        let source_scores = results
            .raw_scores
            .iter()
            .map(|set| {
                let scores = set
                    .iter()
                    .map(|c| (c.uri().to_string(), c.score))
                    .collect();
                (set.source().to_string(), scores)
            })
            .collect();
        let combined = results
            .combined
            .iter()
            .map(|c| (c.uri().to_string(), c.score))
            .collect();
        let accepted = results
            .accepted
            .iter()
            .filter(|(_, cs)| !cs.is_empty())
            .map(|(p, cs)| {
                (
                    p.key().to_string(),
                    cs.iter().map(|c| c.uri().to_string()).collect(),
                )
            })
            .collect();
        Self {
            subject_uri: results.subject.canonical_uri.clone(),
            subject_id: results.subject.id,
            title: results.subject.title.clone(),
            publisher: results.subject.publisher.key().to_string(),
            source_scores,
            combined,
            accepted,
            description: results.trail.render(),
            timestamp: now,
        }
    }

    pub fn accepted_uris(&self) -> impl Iterator<Item = &str> {
        self.accepted.values().flatten().map(String::as_str)
    }
}
