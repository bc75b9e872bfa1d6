use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::errors::ConfigError;
use equiv_core::traits::{IContentResolver, IEquivalenceScorer};
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};

const COMMON_WORDS: [&str; 8] = ["the", "in", "a", "an", "and", "of", "to", "show"];

fn words(title: &str) -> BTreeSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|w| !w.is_empty() && !COMMON_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

fn container_of<'m>(containers: &'m HashMap<String, Arc<Content>>, item: &Content) -> Option<&'m Arc<Content>> {
    item.container.as_ref().and_then(|p| containers.get(&p.uri))
}

/// Scores broadcast candidates on whether they carry the same programme title.
///
/// Schedules often title an episode with the series name on one side and
/// the episode name on the other, so the subject's container and the
/// candidate's container are tried too. Titles match when equal, or when
/// the longer one holds at least the threshold share of the shorter one's
/// words.
pub struct BroadcastTitleSubsetScorer {
    resolver: Arc<dyn IContentResolver>,
    mismatch_score: Score,
    threshold: f64,
    null_channels: BTreeSet<String>,
}

impl BroadcastTitleSubsetScorer {
    pub fn new(
        resolver: Arc<dyn IContentResolver>,
        mismatch_score: Score,
        percent: u8,
    ) -> Result<Self, ConfigError> {
        if percent > 100 {
            return Err(ConfigError::InvalidValue {
                field: "broadcast_title_subset_percent".into(),
                reason: format!("must lie in [0, 100], got {percent}"),
            });
        }
        Ok(Self {
            resolver,
            mismatch_score,
            threshold: f64::from(percent) / 100.0,
            null_channels: BTreeSet::new(),
        })
    }

    /// Subjects broadcast on any of these channels score `Null` throughout.
    pub fn with_null_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn titles_match(&self, a: &str, b: &str) -> bool {
        if a.trim().is_empty() || b.trim().is_empty() {
            return false;
        }
        if a.trim().to_lowercase() == b.trim().to_lowercase() {
            return true;
        }
        let (a, b) = (words(a), words(b));
        let (shorter, longer) = if b.len() < a.len() { (&b, &a) } else { (&a, &b) };
        if shorter.is_empty() {
            return false;
        }
        let contained = shorter.intersection(longer).count();
        contained as f64 / shorter.len() as f64 >= self.threshold
    }

    fn content_titles_match(&self, a: &Content, b: &Content) -> bool {
        match (a.title.as_deref(), b.title.as_deref()) {
            (Some(a), Some(b)) => self.titles_match(a, b),
            _ => false,
        }
    }

    /// Titled containers of the given items, keyed by container uri.
    fn containers<'a>(
        &self,
        items: impl Iterator<Item = &'a Content>,
    ) -> EquivResult<HashMap<String, Arc<Content>>> {
        let uris: BTreeSet<String> = items.filter_map(|c| c.container.as_ref().map(|p| p.uri.clone())).collect();
        if uris.is_empty() {
            return Ok(HashMap::new());
        }
        let uris: Vec<String> = uris.into_iter().collect();
        Ok(self
            .resolver
            .resolve_uris(&uris)?
            .into_iter()
            .filter(|c| c.shape.is_container() && c.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .map(|c| (c.canonical_uri.clone(), c))
            .collect())
    }
}

impl IEquivalenceScorer for BroadcastTitleSubsetScorer {
    fn name(&self) -> &str {
        sources::BROADCAST_TITLE
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::BROADCAST_TITLE);
        if subject.broadcasts.iter().any(|b| self.null_channels.contains(&b.channel)) {
            trail.append("subject broadcast on an ignored channel");
            for candidate in candidates {
                scored.add(Arc::clone(candidate), Score::NULL);
            }
            return Ok(scored);
        }

        let containers = self.containers(std::iter::once(subject).chain(candidates.iter().map(|c| c.as_ref())))?;
        let subject_container = container_of(&containers, subject);

        for candidate in candidates {
            let matched = if self.content_titles_match(subject, candidate) {
                Some("titles")
            } else if subject_container.is_some_and(|c| self.content_titles_match(c, candidate)) {
                Some("subject container")
            } else if container_of(&containers, candidate).is_some_and(|c| self.content_titles_match(subject, c)) {
                Some("candidate container")
            } else {
                None
            };
            let score = match matched {
                Some(via) => {
                    trail.append(format!("{} matched on {}", candidate.label(), via));
                    Score::ONE
                }
                None => {
                    trail.append(format!("{} scored {}", candidate.label(), self.mismatch_score));
                    self.mismatch_score
                }
            };
            scored.add(Arc::clone(candidate), score);
        }
        Ok(scored)
    }
}
