use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::IEquivalenceScorer;
use equiv_core::{AuditTrail, Content, EquivResult, Score, ScoredCandidates};

use crate::titles::{self, TitleType};

/// Scores candidates on title equality after normalisation.
///
/// Titles of different kinds (date, sequence, plain) score `Null`.
pub struct TitleMatchingScorer {
    match_score: Score,
    partial_score: Score,
    mismatch_score: Score,
}

impl TitleMatchingScorer {
    pub fn new(match_score: f64) -> Self {
        Self {
            match_score: Score::value(match_score),
            partial_score: Score::ONE,
            mismatch_score: Score::NULL,
        }
    }

    /// Score given to titles that differ. `Null` unless set.
    pub fn with_mismatch_score(mut self, score: Score) -> Self {
        self.mismatch_score = score;
        self
    }

    pub fn score_titles(&self, subject: &str, candidate: &str) -> Score {
        if TitleType::of(subject) != TitleType::of(candidate) {
            return Score::NULL;
        }
        if titles::same_title(subject, candidate) {
            self.match_score
        } else if titles::same_prefix(subject, candidate) {
            self.partial_score
        } else {
            self.mismatch_score
        }
    }
}

impl IEquivalenceScorer for TitleMatchingScorer {
    fn name(&self) -> &str {
        sources::TITLE
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::TITLE);
        for candidate in candidates {
            let score = match (subject.title.as_deref(), candidate.title.as_deref()) {
                (Some(a), Some(b)) => self.score_titles(a, b),
                _ => Score::NULL,
            };
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
    fn exact_partial_and_mismatch() {
        let scorer = TitleMatchingScorer::new(2.0).with_mismatch_score(Score::Real(-1.0));
        assert_eq!(scorer.score_titles("The Office", "Office"), Score::Real(2.0));
        assert_eq!(scorer.score_titles("Horizon: Mars", "Horizon"), Score::ONE);
        assert_eq!(scorer.score_titles("Horizon", "Panorama"), Score::Real(-1.0));
    }

    #[test]
    fn different_title_types_abstain() {
        let scorer = TitleMatchingScorer::new(2.0).with_mismatch_score(Score::Real(-1.0));
        assert_eq!(scorer.score_titles("Episode 3", "12/03/2011"), Score::NULL);
    }

    #[test]
    fn missing_titles_score_null() {
        let scorer = TitleMatchingScorer::new(2.0);
        let subject = Content::item("s", "pa").with_title("Rose");
        let candidates = vec![
            Arc::new(Content::item("a", "bbc")),
            Arc::new(Content::item("b", "bbc").with_title("Rose")),
        ];
        let scored = scorer.score(&subject, &candidates, &mut AuditTrail::new()).unwrap();
        assert_eq!(scored.score_of("a"), Some(Score::NULL));
        assert_eq!(scored.score_of("b"), Some(Score::Real(2.0)));
        assert_eq!(scored.source(), "Title");
    }
}
