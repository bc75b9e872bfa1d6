//! Scorers comparing descriptions, with each other and with titles.
//!
//! Capitalised words in a synopsis are mostly names of people and places.
//! Two records sharing many of them very likely describe the same programme.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use equiv_core::config::defaults;
use equiv_core::constants::sources;
use equiv_core::traits::IEquivalenceScorer;
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};
use regex::Regex;

static CAPITALISED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b([A-Z]\w*)\b").ok());

const COMMON_WORDS: [&str; 8] = ["the", "in", "a", "and", "&", "of", "to", "show"];

fn is_common(word: &str) -> bool {
    COMMON_WORDS.contains(&word)
}

/// Lowercased capitalised words of a description, common words removed.
fn capitalised_words(description: Option<&str>) -> BTreeSet<String> {
    let (Some(text), Some(re)) = (description, CAPITALISED.as_ref()) else {
        return BTreeSet::new();
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !is_common(w))
        .collect()
}

fn alphanumeric_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Capitalised description words, punctuation ignored.
fn description_words(description: Option<&str>) -> BTreeSet<String> {
    description
        .into_iter()
        .flat_map(alphanumeric_words)
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .map(str::to_lowercase)
        .filter(|w| !is_common(w))
        .collect()
}

fn title_words(title: Option<&str>) -> BTreeSet<String> {
    title
        .into_iter()
        .flat_map(alphanumeric_words)
        .map(str::to_lowercase)
        .filter(|w| !is_common(w))
        .collect()
}

/// `ONE` when the capitalised words of the two descriptions overlap by more
/// than the threshold (shared over all), `Null` otherwise.
pub struct DescriptionMatchingScorer {
    threshold: f64,
}

impl DescriptionMatchingScorer {
    pub fn new() -> Self {
        Self::with_threshold(defaults::DEFAULT_DESCRIPTION_OVERLAP)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn score_descriptions(&self, subject: Option<&str>, candidate: Option<&str>) -> Score {
        let (a, b) = (capitalised_words(subject), capitalised_words(candidate));
        let union = a.union(&b).count();
        if union == 0 {
            return Score::NULL;
        }
        let shared = a.intersection(&b).count();
        Score::one_or_null(shared as f64 / union as f64 > self.threshold)
    }
}

impl Default for DescriptionMatchingScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl IEquivalenceScorer for DescriptionMatchingScorer {
    fn name(&self) -> &str {
        sources::DESCRIPTION
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::DESCRIPTION);
        for candidate in candidates {
            let score = self.score_descriptions(subject.description.as_deref(), candidate.description.as_deref());
            trail.append(format!("{} scored {}", candidate.label(), score));
            scored.add(Arc::clone(candidate), score);
        }
        Ok(scored)
    }
}

/// Matches when one side's title shows up in the other side's description.
///
/// Either direction counts: more than `1 / divisor` of the candidate's title
/// words among the subject's capitalised description words, or the reverse.
pub struct DescriptionTitleMatchingScorer {
    divisor: f64,
    mismatch_score: Score,
}

impl DescriptionTitleMatchingScorer {
    pub fn new() -> Self {
        Self {
            divisor: defaults::DEFAULT_DESCRIPTION_TITLE_DIVISOR,
            mismatch_score: Score::NULL,
        }
    }

    pub fn with_divisor(mut self, divisor: f64) -> Self {
        self.divisor = divisor;
        self
    }

    pub fn with_mismatch_score(mut self, score: Score) -> Self {
        self.mismatch_score = score;
        self
    }

    fn appears_in(&self, title: &BTreeSet<String>, description: &BTreeSet<String>) -> bool {
        let shared = title.intersection(description).count();
        shared as f64 > title.len() as f64 / self.divisor
    }

    pub fn score_pair(&self, subject: &Content, candidate: &Content) -> Score {
        let subject_description = description_words(subject.description.as_deref());
        let candidate_description = description_words(candidate.description.as_deref());
        let subject_title = title_words(subject.title.as_deref());
        let candidate_title = title_words(candidate.title.as_deref());

        if self.appears_in(&candidate_title, &subject_description)
            || self.appears_in(&subject_title, &candidate_description)
        {
            Score::ONE
        } else {
            self.mismatch_score
        }
    }
}

impl Default for DescriptionTitleMatchingScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl IEquivalenceScorer for DescriptionTitleMatchingScorer {
    fn name(&self) -> &str {
        sources::DESCRIPTION_TITLE
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::DESCRIPTION_TITLE);
        for candidate in candidates {
            let score = self.score_pair(subject, candidate);
            trail.append(format!("{} scored {}", candidate.label(), score));
            scored.add(Arc::clone(candidate), score);
        }
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalised_words_skip_common_words() {
        let words = capitalised_words(Some("The Doctor and Rose land in London. A Dalek waits."));
        let expected: BTreeSet<String> =
            ["doctor", "rose", "london", "dalek"].iter().map(|w| w.to_string()).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn shared_names_match_descriptions() {
        let scorer = DescriptionMatchingScorer::new();
        let subject = Some("The Doctor and Rose arrive in London.");
        assert_eq!(
            scorer.score_descriptions(subject, Some("Rose and the Doctor visit London.")),
            Score::ONE
        );
        assert_eq!(
            scorer.score_descriptions(subject, Some("Fred visits Paris with Jane.")),
            Score::NULL
        );
        assert_eq!(scorer.score_descriptions(None, Some("all lower case")), Score::NULL);
    }

    #[test]
    fn title_found_in_the_other_description() {
        let scorer = DescriptionTitleMatchingScorer::new().with_mismatch_score(Score::Real(-1.0));
        let subject = Content::item("s", "a")
            .with_title("Episode 12")
            .with_description("Marvellous Machines: Ben builds a robot.");
        let candidate = Content::item("c", "b").with_title("Marvellous Machines");
        assert_eq!(scorer.score_pair(&subject, &candidate), Score::ONE);

        let other = Content::item("o", "b").with_title("Garden Gadgets");
        assert_eq!(scorer.score_pair(&subject, &other), Score::Real(-1.0));
    }

    #[test]
    fn half_the_title_is_not_enough() {
        let scorer = DescriptionTitleMatchingScorer::new();
        let subject = Content::item("s", "a").with_description("Machines everywhere.");
        let candidate = Content::item("c", "b").with_title("Marvellous Machines");
        assert_eq!(scorer.score_pair(&subject, &candidate), Score::NULL);
    }
}
