use std::collections::BTreeMap;

use equiv_core::candidates::ScoredCandidate;
use equiv_core::traits::IEquivalenceExtractor;
use equiv_core::{AuditTrail, Content, Publisher};

use super::{top_score, uris};

/// All candidates tied at the maximum, provided the maximum reaches `minimum`.
/// Optionally evaluated separately for each candidate publisher.
#[derive(Debug, Clone, Copy)]
pub struct SameHighScoreAndPublisherExtractor {
    minimum: f64,
    per_publisher: bool,
}

impl SameHighScoreAndPublisherExtractor {
    pub fn new(minimum: f64) -> Self {
        Self {
            minimum,
            per_publisher: false,
        }
    }

    pub fn per_publisher(minimum: f64) -> Self {
        Self {
            minimum,
            per_publisher: true,
        }
    }

    fn leaders(&self, pool: &[ScoredCandidate]) -> Vec<ScoredCandidate> {
        match top_score(pool) {
            Some(top) if top >= self.minimum => pool
                .iter()
                .filter(|c| c.score.as_f64() == Some(top))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl IEquivalenceExtractor for SameHighScoreAndPublisherExtractor {
    fn name(&self) -> &str {
        "same high score"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        _subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        let accepted = if self.per_publisher {
            let mut bins: BTreeMap<&Publisher, Vec<ScoredCandidate>> = BTreeMap::new();
            for c in candidates {
                bins.entry(c.publisher()).or_default().push(c.clone());
            }
            let chosen: Vec<ScoredCandidate> =
                bins.values().flat_map(|bin| self.leaders(bin)).collect();
            candidates
                .iter()
                .filter(|c| chosen.iter().any(|a| a.uri() == c.uri()))
                .cloned()
                .collect()
        } else {
            self.leaders(candidates)
        };
        trail.append(format!("{}: [{}]", self.name(), uris(&accepted)));
        accepted
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use equiv_core::Score;

    use super::*;

    fn c(uri: &str, publisher: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate::new(Arc::new(Content::item(uri, publisher)), Score::Real(score))
    }

    #[test]
    fn ties_at_max_are_accepted_above_minimum() {
        let pool = vec![c("a", "bbc", 2.0), c("b", "bbc", 2.0), c("c", "bbc", 1.0)];
        let subject = Content::item("s", "pa");
        let got = SameHighScoreAndPublisherExtractor::new(1.0).extract(&pool, &subject, &mut AuditTrail::new());
        assert_eq!(got.len(), 2);
        let none = SameHighScoreAndPublisherExtractor::new(3.0).extract(&pool, &subject, &mut AuditTrail::new());
        assert!(none.is_empty());
    }

    #[test]
    fn per_publisher_takes_each_publishers_leaders() {
        let pool = vec![c("a", "bbc", 3.0), c("b", "itv", 2.0), c("c", "itv", 2.0), c("d", "bbc", 1.0)];
        let subject = Content::item("s", "pa");
        let got: Vec<String> = SameHighScoreAndPublisherExtractor::per_publisher(1.5)
            .extract(&pool, &subject, &mut AuditTrail::new())
            .iter()
            .map(|c| c.uri().to_string())
            .collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }
}
