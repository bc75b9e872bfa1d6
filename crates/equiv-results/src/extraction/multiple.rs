use chrono::Duration;
use equiv_core::candidates::{sort_by_score, ScoredCandidate};
use equiv_core::traits::IEquivalenceExtractor;
use equiv_core::{AuditTrail, Content, ContentShape};

use super::uris;

/// Accepts a cluster of closely scored item candidates, but only when the
/// cluster has more than one member. Used where a publisher splits one
/// programme into several records (e.g. per-region versions).
#[derive(Debug, Clone, Copy)]
pub struct MultipleCandidateExtractor {
    band: f64,
    broadcast_flexibility: Option<Duration>,
}

impl MultipleCandidateExtractor {
    /// Candidates within `band` of the leader's score join the cluster.
    pub fn new(band: f64) -> Self {
        Self {
            band,
            broadcast_flexibility: None,
        }
    }

    /// Also require every member to share a broadcast slot with the leader.
    pub fn requiring_broadcast_overlap(band: f64, flexibility: Duration) -> Self {
        Self {
            band,
            broadcast_flexibility: Some(flexibility),
        }
    }

    fn shares_slot(&self, leader: &Content, other: &Content) -> bool {
        match self.broadcast_flexibility {
            None => true,
            Some(flex) => leader
                .broadcasts
                .iter()
                .any(|a| other.broadcasts.iter().any(|b| a.overlaps(b, flex))),
        }
    }
}

impl Default for MultipleCandidateExtractor {
    fn default() -> Self {
        Self::new(equiv_core::config::defaults::DEFAULT_MULTIPLE_CANDIDATE_BAND)
    }
}

impl IEquivalenceExtractor for MultipleCandidateExtractor {
    fn name(&self) -> &str {
        "multiple candidate"
    }

    fn extract(
        &self,
        candidates: &[ScoredCandidate],
        subject: &Content,
        trail: &mut AuditTrail,
    ) -> Vec<ScoredCandidate> {
        if subject.shape != ContentShape::Item {
            trail.append(format!("{}: only applies to items", self.name()));
            return Vec::new();
        }
        let mut items: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.candidate.shape == ContentShape::Item && c.score.is_real())
            .cloned()
            .collect();
        sort_by_score(&mut items);
        let Some(leader) = items.first() else {
            return Vec::new();
        };
        let Some(top) = leader.score.as_f64() else {
            return Vec::new();
        };
        let cluster: Vec<ScoredCandidate> = items
            .iter()
            .filter(|c| c.score.as_f64().is_some_and(|s| s >= top - self.band))
            .filter(|c| self.shares_slot(&leader.candidate, &c.candidate))
            .cloned()
            .collect();
        if cluster.len() > 1 {
            trail.append(format!("{}: [{}]", self.name(), uris(&cluster)));
            cluster
        } else {
            trail.append(format!("{}: fewer than two close candidates", self.name()));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use equiv_core::content::Broadcast;
    use equiv_core::Score;

    use super::*;

    fn c(content: Content, score: f64) -> ScoredCandidate {
        ScoredCandidate::new(Arc::new(content), Score::Real(score))
    }

    #[test]
    fn single_candidate_is_not_enough() {
        let subject = Content::item("s", "pa");
        let pool = vec![c(Content::item("a", "bbc"), 1.0), c(Content::item("b", "bbc"), 0.2)];
        assert!(MultipleCandidateExtractor::new(0.3)
            .extract(&pool, &subject, &mut AuditTrail::new())
            .is_empty());
    }

    #[test]
    fn close_candidates_are_accepted_together() {
        let subject = Content::item("s", "pa");
        let pool = vec![
            c(Content::item("a", "bbc"), 1.0),
            c(Content::item("b", "bbc"), 0.8),
            c(Content::item("z", "bbc"), 0.5),
        ];
        let got = MultipleCandidateExtractor::new(0.3).extract(&pool, &subject, &mut AuditTrail::new());
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn containers_never_qualify() {
        let subject = Content::brand("s", "pa");
        let pool = vec![c(Content::item("a", "bbc"), 1.0), c(Content::item("b", "bbc"), 1.0)];
        assert!(MultipleCandidateExtractor::new(0.3)
            .extract(&pool, &subject, &mut AuditTrail::new())
            .is_empty());
    }

    #[test]
    fn broadcast_overlap_can_be_required() {
        let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
        let subject = Content::item("s", "pa");
        let a = Content::item("a", "bbc").with_broadcast(Broadcast::new("one", at(20), at(21)));
        let b = Content::item("b", "bbc").with_broadcast(Broadcast::new("one", at(20), at(21)));
        let far = Content::item("f", "bbc").with_broadcast(Broadcast::new("one", at(9), at(10)));
        let extractor = MultipleCandidateExtractor::requiring_broadcast_overlap(0.3, Duration::minutes(5));
        let got = extractor.extract(&[c(a.clone(), 1.0), c(b, 1.0)], &subject, &mut AuditTrail::new());
        assert_eq!(got.len(), 2);
        let got = extractor.extract(&[c(a, 1.0), c(far, 1.0)], &subject, &mut AuditTrail::new());
        assert!(got.is_empty());
    }

    #[test]
    fn leader_is_found_in_an_unsorted_pool() {
        let subject = Content::item("s", "pa");
        let pool = vec![
            c(Content::item("z", "bbc"), 0.5),
            c(Content::item("b", "bbc"), 0.8),
            c(Content::item("a", "bbc"), 1.0),
        ];
        let got = MultipleCandidateExtractor::new(0.3).extract(&pool, &subject, &mut AuditTrail::new());
        let uris: Vec<&str> = got.iter().map(|c| c.uri()).collect();
        assert_eq!(uris, vec!["a", "b"]);
    }
}
