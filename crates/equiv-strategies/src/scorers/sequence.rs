use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::traits::IEquivalenceScorer;
use equiv_core::{AuditTrail, Content, ContentShape, EquivResult, Score, ScoredCandidates};

/// Scores items sitting at the same position in their series.
pub struct SequenceItemScorer {
    score: Score,
}

impl SequenceItemScorer {
    pub fn new(score: f64) -> Self {
        Self {
            score: Score::value(score),
        }
    }

    fn same_position(subject: &Content, candidate: &Content) -> bool {
        subject.shape == ContentShape::Item
            && candidate.shape == ContentShape::Item
            && subject.episode_number.is_some()
            && subject.episode_number == candidate.episode_number
            && subject.series_number == candidate.series_number
    }
}

impl IEquivalenceScorer for SequenceItemScorer {
    fn name(&self) -> &str {
        sources::SEQUENCE
    }

    fn score(
        &self,
        subject: &Content,
        candidates: &[Arc<Content>],
        trail: &mut AuditTrail,
    ) -> EquivResult<ScoredCandidates> {
        let mut scored = ScoredCandidates::new(sources::SEQUENCE);
        for candidate in candidates {
            let score = if Self::same_position(subject, candidate) {
                trail.append(format!("{} in same position", candidate.canonical_uri));
                self.score
            } else {
                Score::NULL
            };
            scored.add(Arc::clone(candidate), score);
        }
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(uri: &str, series: Option<u32>, episode: Option<u32>) -> Content {
        let mut c = Content::item(uri, "p");
        c.series_number = series;
        c.episode_number = episode;
        c
    }

    #[test]
    fn matches_on_series_and_episode() {
        let scorer = SequenceItemScorer::new(1.0);
        let subject = episode("s", Some(1), Some(3));
        let candidates = vec![
            Arc::new(episode("same", Some(1), Some(3))),
            Arc::new(episode("other-series", Some(2), Some(3))),
            Arc::new(episode("no-number", Some(1), None)),
        ];
        let scored = scorer.score(&subject, &candidates, &mut AuditTrail::new()).unwrap();
        assert_eq!(scored.score_of("same"), Some(Score::ONE));
        assert_eq!(scored.score_of("other-series"), Some(Score::NULL));
        assert_eq!(scored.score_of("no-number"), Some(Score::NULL));
    }

    #[test]
    fn subject_without_episode_number_abstains() {
        let scorer = SequenceItemScorer::new(1.0);
        let subject = episode("s", None, None);
        let scored = scorer
            .score(&subject, &[Arc::new(episode("c", None, None))], &mut AuditTrail::new())
            .unwrap();
        assert_eq!(scored.score_of("c"), Some(Score::NULL));
    }
}
