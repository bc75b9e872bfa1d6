use std::collections::BTreeMap;
use std::sync::Arc;

use crate::candidates::{ScoredCandidate, ScoredCandidates};
use crate::content::{Content, Publisher};
use crate::description::AuditTrail;

/// Everything one run produced: raw per-source sets, the combined set, and
/// the accepted candidates per publisher.
#[derive(Debug, Clone)]
pub struct EquivalenceResults {
    pub subject: Arc<Content>,
    pub raw_scores: Vec<ScoredCandidates>,
    pub combined: ScoredCandidates,
    pub accepted: BTreeMap<Publisher, Vec<ScoredCandidate>>,
    pub trail: AuditTrail,
}

impl EquivalenceResults {
    pub fn accepted_candidates(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.accepted.values().flatten()
    }

    pub fn accepted_uris(&self) -> Vec<String> {
        self.accepted_candidates()
            .map(|c| c.uri().to_string())
            .collect()
    }

    pub fn has_accepted(&self) -> bool {
        self.accepted.values().any(|v| !v.is_empty())
    }
}
