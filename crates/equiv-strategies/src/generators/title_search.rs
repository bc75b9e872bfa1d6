use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::{IEquivalenceGenerator, ISearchResolver, SearchQuery};
use equiv_core::{AuditTrail, Content, ContentShape, EquivResult, Publisher, Score, ScoredCandidates};
use tracing::debug;

use crate::titles;

/// Searches for content with a similar title.
///
/// A hit scores `match_score × similarity`; hits less similar than the floor
/// are dropped.
pub struct TitleSearchGenerator {
    search: Arc<dyn ISearchResolver>,
    publishers: Vec<Publisher>,
    shapes: Vec<ContentShape>,
    limit: usize,
    match_score: f64,
    similarity_floor: f64,
}

impl TitleSearchGenerator {
    pub fn new(
        search: Arc<dyn ISearchResolver>,
        publishers: impl IntoIterator<Item = Publisher>,
        match_score: f64,
    ) -> Self {
        Self {
            search,
            publishers: publishers.into_iter().collect(),
            shapes: Vec::new(),
            limit: equiv_core::config::defaults::DEFAULT_TITLE_SEARCH_LIMIT,
            match_score,
            similarity_floor: equiv_core::config::defaults::DEFAULT_TITLE_SIMILARITY_FLOOR,
        }
    }

    /// Only return hits of these shapes.
    pub fn for_shapes(mut self, shapes: &[ContentShape]) -> Self {
        self.shapes = shapes.to_vec();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_similarity_floor(mut self, floor: f64) -> Self {
        self.similarity_floor = floor;
        self
    }
}

impl IEquivalenceGenerator for TitleSearchGenerator {
    fn name(&self) -> &str {
        sources::TITLE_SEARCH
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::TITLE_SEARCH);
        let Some(title) = subject.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            trail.append("subject has no title");
            return Ok(found);
        };

        let query = SearchQuery {
            title: title.to_string(),
            publishers: self.publishers.clone(),
            shapes: self.shapes.clone(),
            limit: self.limit,
        };
        let hits = self.search.search(&query)?;
        let total = hits.len();

        for hit in hits {
            if hit.canonical_uri == subject.canonical_uri || !self.publishers.contains(&hit.publisher) {
                continue;
            }
            let Some(hit_title) = hit.title.as_deref() else {
                continue;
            };
            let similarity = titles::similarity(title, hit_title);
            if similarity < self.similarity_floor {
                continue;
            }
            let score = Score::value(self.match_score * similarity);
            trail.append(format!("{} scored {}", hit.label(), score));
            found.add(hit, score);
        }
        debug!(
            subject = %subject.canonical_uri,
            hits = total,
            kept = found.len(),
            "title search"
        );
        Ok(found)
    }
}
