//! Scored candidate sets: one source's opinions, keyed by candidate uri.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::content::{Content, Publisher};
use crate::score::Score;

/// A candidate together with the score a source (or the combiner) gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Arc<Content>,
    pub score: Score,
}

impl ScoredCandidate {
    pub fn new(candidate: Arc<Content>, score: Score) -> Self {
        Self { candidate, score }
    }

    pub fn uri(&self) -> &str {
        &self.candidate.canonical_uri
    }

    pub fn publisher(&self) -> &Publisher {
        &self.candidate.publisher
    }
}

impl Serialize for ScoredCandidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ScoredCandidate", 3)?;
        s.serialize_field("uri", self.uri())?;
        s.serialize_field("publisher", self.publisher())?;
        s.serialize_field("score", &self.score)?;
        s.end()
    }
}

/// Candidate → score, tagged with the name of the source that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidates {
    source: String,
    candidates: BTreeMap<String, ScoredCandidate>,
}

impl ScoredCandidates {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            candidates: BTreeMap::new(),
        }
    }

    /// An empty set standing in for a source that abstained.
    pub fn abstained(source: impl Into<String>) -> Self {
        Self::new(source)
    }

    pub fn from_candidates<I>(source: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = ScoredCandidate>,
    {
        let mut set = Self::new(source);
        for c in candidates {
            set.add(c.candidate, c.score);
        }
        set
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Add a candidate. A repeated candidate keeps the better of the two scores.
    pub fn add(&mut self, candidate: Arc<Content>, score: Score) {
        self.candidates
            .entry(candidate.canonical_uri.clone())
            .and_modify(|existing| existing.score = existing.score.max(score))
            .or_insert_with(|| ScoredCandidate::new(candidate, score));
    }

    pub fn get(&self, uri: &str) -> Option<&ScoredCandidate> {
        self.candidates.get(uri)
    }

    pub fn score_of(&self, uri: &str) -> Option<Score> {
        self.candidates.get(uri).map(|c| c.score)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.candidates.contains_key(uri)
    }

    pub fn remove(&mut self, uri: &str) -> Option<ScoredCandidate> {
        self.candidates.remove(uri)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&ScoredCandidate) -> bool) {
        self.candidates.retain(|_, c| keep(c));
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in uri order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.candidates.values()
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(String::as_str)
    }

    /// Candidates sorted by score descending, ties broken by uri.
    pub fn ordered(&self) -> Vec<ScoredCandidate> {
        let mut ordered: Vec<ScoredCandidate> = self.candidates.values().cloned().collect();
        sort_by_score(&mut ordered);
        ordered
    }

    /// Same candidates, every score replaced by `f(score)`.
    pub fn map_scores(&self, f: impl Fn(Score) -> Score) -> Self {
        let mut mapped = self.clone();
        for c in mapped.candidates.values_mut() {
            c.score = f(c.score);
        }
        mapped
    }

    pub fn renamed(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Sort by score descending (`Null` last), then uri ascending for determinism.
pub fn sort_by_score(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| a.score.cmp_desc(&b.score).then_with(|| a.uri().cmp(b.uri())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(uri: &str) -> Arc<Content> {
        Arc::new(Content::item(uri, "p"))
    }

    #[test]
    fn repeated_candidate_keeps_best_score() {
        let mut set = ScoredCandidates::new("title");
        set.add(content("a"), Score::Null);
        set.add(content("a"), Score::Real(0.5));
        set.add(content("a"), Score::Real(0.2));
        assert_eq!(set.len(), 1);
        assert_eq!(set.score_of("a"), Some(Score::Real(0.5)));
    }

    #[test]
    fn ordered_puts_null_last_and_breaks_ties_by_uri() {
        let mut set = ScoredCandidates::new("s");
        set.add(content("c"), Score::Null);
        set.add(content("b"), Score::Real(1.0));
        set.add(content("a"), Score::Real(1.0));
        set.add(content("d"), Score::Real(2.0));
        let uris: Vec<String> = set.ordered().iter().map(|c| c.uri().to_string()).collect();
        assert_eq!(uris, vec!["d", "a", "b", "c"]);
    }
}
