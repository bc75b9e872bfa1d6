use std::collections::{BTreeSet, HashSet};

use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceFilter;
use equiv_core::{AuditTrail, Content, Publisher};

use super::reject;

/// Only candidates from the configured target publishers survive.
#[derive(Debug, Clone)]
pub struct PublisherFilter {
    targets: BTreeSet<Publisher>,
}

impl PublisherFilter {
    pub fn new(targets: impl IntoIterator<Item = Publisher>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }
}

impl IEquivalenceFilter for PublisherFilter {
    fn name(&self) -> &str {
        "publisher"
    }

    fn accepts(&self, candidate: &ScoredCandidate, _subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = self.targets.contains(candidate.publisher());
        if !passes {
            reject(
                trail,
                candidate,
                self.name(),
                &format!("{} is not a target publisher", candidate.publisher()),
            );
        }
        passes
    }
}

/// Drops content that is no longer actively published.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnpublishedContentFilter;

impl IEquivalenceFilter for UnpublishedContentFilter {
    fn name(&self) -> &str {
        "unpublished"
    }

    fn accepts(&self, candidate: &ScoredCandidate, _subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = candidate.candidate.actively_published;
        if !passes {
            reject(trail, candidate, self.name(), "not actively published");
        }
        passes
    }
}

/// Curated exclusions by uri or id.
#[derive(Debug, Default, Clone)]
pub struct ExclusionListFilter {
    uris: HashSet<String>,
    ids: HashSet<u64>,
}

impl ExclusionListFilter {
    pub fn new(uris: impl IntoIterator<Item = String>, ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            uris: uris.into_iter().collect(),
            ids: ids.into_iter().collect(),
        }
    }

    pub fn excludes(&self, content: &Content) -> bool {
        self.uris.contains(&content.canonical_uri)
            || content.id.is_some_and(|id| self.ids.contains(&id))
    }
}

impl IEquivalenceFilter for ExclusionListFilter {
    fn name(&self) -> &str {
        "exclusion list"
    }

    fn accepts(&self, candidate: &ScoredCandidate, _subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = !self.excludes(&candidate.candidate);
        if !passes {
            reject(trail, candidate, self.name(), "excluded");
        }
        passes
    }
}

/// Synthesised placeholder containers are never equivalents.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderFilter;

impl IEquivalenceFilter for PlaceholderFilter {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn accepts(&self, candidate: &ScoredCandidate, _subject: &Content, trail: &mut AuditTrail) -> bool {
        let passes = !candidate.candidate.placeholder;
        if !passes {
            reject(trail, candidate, self.name(), "placeholder container");
        }
        passes
    }
}
