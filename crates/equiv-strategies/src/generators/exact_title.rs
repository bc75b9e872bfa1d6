use std::sync::{Arc, LazyLock};

use equiv_core::config::defaults;
use equiv_core::constants::sources;
use equiv_core::traits::{IEquivalenceGenerator, ISearchResolver, SearchQuery};
use equiv_core::{AuditTrail, Content, ContentShape, EquivResult, Publisher, Score, ScoredCandidates};
use regex::Regex;

static STANDARD_TITLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\sa-zA-Z0-9]*$").ok());

/// Titles shorter than this are searched regardless of their characters.
const SHORT_TITLE_CHARS: usize = 4;

/// Whether fuzzy title matching is unreliable for `title`: very short, or
/// written with characters outside plain ASCII letters, digits and
/// punctuation.
pub fn needs_exact_match(title: &str) -> bool {
    let standard = STANDARD_TITLE.as_ref().is_some_and(|re| re.is_match(title));
    !standard || title.chars().count() < SHORT_TITLE_CHARS
}

/// Proposes hits whose title is exactly the subject's, with a zero score.
///
/// Only runs for titles where [`needs_exact_match`] holds; other titles are
/// left to the fuzzy title search.
pub struct ExactTitleGenerator {
    search: Arc<dyn ISearchResolver>,
    publishers: Vec<Publisher>,
    shapes: Vec<ContentShape>,
    same_specialization: bool,
}

impl ExactTitleGenerator {
    pub fn new(search: Arc<dyn ISearchResolver>, publishers: impl IntoIterator<Item = Publisher>) -> Self {
        Self {
            search,
            publishers: publishers.into_iter().collect(),
            shapes: Vec::new(),
            same_specialization: false,
        }
    }

    pub fn for_shapes(mut self, shapes: &[ContentShape]) -> Self {
        self.shapes = shapes.to_vec();
        self
    }

    /// Drop hits whose specialization differs from the subject's.
    pub fn matching_specialization(mut self) -> Self {
        self.same_specialization = true;
        self
    }
}

impl IEquivalenceGenerator for ExactTitleGenerator {
    fn name(&self) -> &str {
        sources::EXACT_TITLE
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::EXACT_TITLE);
        let Some(title) = subject.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            trail.append("subject has no title");
            return Ok(found);
        };
        if !needs_exact_match(title) {
            trail.append("title suits fuzzy matching");
            return Ok(found);
        }

        let query = SearchQuery {
            title: title.to_string(),
            publishers: self.publishers.clone(),
            shapes: self.shapes.clone(),
            limit: defaults::DEFAULT_TITLE_SEARCH_LIMIT,
        };
        for hit in self.search.search(&query)? {
            if !hit.actively_published
                || hit.canonical_uri == subject.canonical_uri
                || !self.publishers.contains(&hit.publisher)
                || hit.title.as_deref() != Some(title)
            {
                continue;
            }
            if self.same_specialization && hit.specialization != subject.specialization {
                continue;
            }
            trail.append(format!("{} has the exact title", hit.label()));
            found.add(hit, Score::ZERO);
        }
        Ok(found)
    }
}
