use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use equiv_core::config::defaults;
use equiv_core::constants::sources;
use equiv_core::content::Specialization;
use equiv_core::traits::{IEquivalenceGenerator, ISearchResolver, SearchQuery};
use equiv_core::{AuditTrail, Content, ContentShape, EquivResult, Publisher, Score, ScoredCandidates};
use regex::Regex;
use tracing::debug;

use crate::titles;

static IMDB_REF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^https?://(www\.)?imdb\.com/title/\w+/?$").ok());
static RATING: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\(?\b(un)?rated\b\)?").ok());

fn imdb_ref(film: &Content) -> Option<&str> {
    let re = IMDB_REF.as_ref()?;
    film.alias_uris.iter().map(String::as_str).find(|uri| re.is_match(uri))
}

/// Title without rating qualifiers, which publishers attach inconsistently.
fn search_title(title: &str) -> String {
    let stripped = match RATING.as_ref() {
        Some(re) => re.replace_all(title, ""),
        None => title.into(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Searches for films by title and scores hits on release year.
///
/// A shared IMDB link scores `1`. Otherwise a hit within the year tolerance
/// scores its title similarity and one outside it scores `-1`.
pub struct FilmEquivalenceGenerator {
    search: Arc<dyn ISearchResolver>,
    publishers: Vec<Publisher>,
    limit: usize,
    year_tolerance: u16,
    accept_null_years: bool,
}

impl FilmEquivalenceGenerator {
    pub fn new(search: Arc<dyn ISearchResolver>, publishers: impl IntoIterator<Item = Publisher>) -> Self {
        Self {
            search,
            publishers: publishers.into_iter().collect(),
            limit: defaults::DEFAULT_TITLE_SEARCH_LIMIT,
            year_tolerance: defaults::DEFAULT_FILM_YEAR_TOLERANCE,
            accept_null_years: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_year_tolerance(mut self, years: u16) -> Self {
        self.year_tolerance = years;
        self
    }

    /// Treat a missing year on either side as a fit instead of refusing.
    pub fn accepting_null_years(mut self, accept: bool) -> Self {
        self.accept_null_years = accept;
        self
    }

    fn year_fits(&self, film: Option<u16>, other: Option<u16>) -> bool {
        match (film, other) {
            (Some(a), Some(b)) => a.abs_diff(b) <= self.year_tolerance,
            _ => self.accept_null_years,
        }
    }
}

impl IEquivalenceGenerator for FilmEquivalenceGenerator {
    fn name(&self) -> &str {
        sources::FILM
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::FILM);
        if subject.specialization != Some(Specialization::Film) || !subject.actively_published {
            trail.append("not a published film");
            return Ok(found);
        }
        let Some(title) = subject.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            trail.append("film has no title");
            return Ok(found);
        };
        if subject.year.is_none() && !self.accept_null_years {
            trail.append("film has no year");
            return Ok(found);
        }

        let query = SearchQuery {
            title: search_title(title),
            publishers: self.publishers.clone(),
            shapes: vec![ContentShape::Item],
            limit: self.limit,
        };
        let hits = self.search.search(&query)?;
        let imdb = imdb_ref(subject);
        let mut seen = BTreeSet::new();

        for hit in hits {
            let same_record = hit.canonical_uri == subject.canonical_uri
                || (subject.id.is_some() && hit.id == subject.id);
            if same_record
                || hit.specialization != Some(Specialization::Film)
                || !self.publishers.contains(&hit.publisher)
                || !seen.insert(hit.canonical_uri.clone())
            {
                continue;
            }
            let score = if imdb.is_some() && imdb == imdb_ref(&hit) {
                trail.append(format!("{} shares the IMDB link", hit.label()));
                Score::ONE
            } else if self.year_fits(subject.year, hit.year) {
                Score::value(titles::similarity(title, hit.title.as_deref().unwrap_or("")))
            } else {
                trail.append(format!("{} is from the wrong year", hit.label()));
                Score::Real(-1.0)
            };
            trail.append(format!("{} scored {}", hit.label(), score));
            found.add(hit, score);
        }
        debug!(subject = %subject.canonical_uri, kept = found.len(), "film search");
        Ok(found)
    }
}
