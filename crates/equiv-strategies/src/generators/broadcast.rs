use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use equiv_core::constants::sources;
use equiv_core::traits::{IEquivalenceGenerator, IScheduleResolver};
use equiv_core::{AuditTrail, Content, ContentShape, EquivResult, Publisher, Score, ScoredCandidates};
use tracing::debug;

/// Proposes items broadcast on the same channel at (about) the same time.
///
/// Score is the share of the subject's broadcasts the candidate matched, so
/// an item matching every transmission scores 1.
pub struct BroadcastMatchingGenerator {
    schedules: Arc<dyn IScheduleResolver>,
    publishers: Vec<Publisher>,
    flexibility: Duration,
}

impl BroadcastMatchingGenerator {
    pub fn new(
        schedules: Arc<dyn IScheduleResolver>,
        publishers: impl IntoIterator<Item = Publisher>,
        flexibility: Duration,
    ) -> Self {
        Self {
            schedules,
            publishers: publishers.into_iter().collect(),
            flexibility,
        }
    }
}

impl IEquivalenceGenerator for BroadcastMatchingGenerator {
    fn name(&self) -> &str {
        sources::BROADCAST
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::BROADCAST);
        if subject.shape != ContentShape::Item || subject.broadcasts.is_empty() {
            trail.append("no broadcasts to match");
            return Ok(found);
        }

        let considered = subject.broadcasts.len();
        let mut matched: BTreeMap<String, (Arc<Content>, usize)> = BTreeMap::new();
        for broadcast in &subject.broadcasts {
            let from = broadcast.transmission_start - self.flexibility;
            let to = broadcast.transmission_end + self.flexibility;
            let scheduled = self
                .schedules
                .schedule(&broadcast.channel, from, to, &self.publishers)?;
            for item in scheduled {
                if item.canonical_uri == subject.canonical_uri || item.shape != ContentShape::Item {
                    continue;
                }
                let hit = item
                    .broadcasts
                    .iter()
                    .any(|b| b.matches(broadcast, self.flexibility));
                if hit {
                    matched
                        .entry(item.canonical_uri.clone())
                        .or_insert_with(|| (Arc::clone(&item), 0))
                        .1 += 1;
                }
            }
        }

        for (candidate, count) in matched.into_values() {
            let score = Score::value((count as f64 / considered as f64).min(1.0));
            trail.append(format!(
                "{} matched {count}/{considered} broadcasts",
                candidate.canonical_uri
            ));
            found.add(candidate, score);
        }
        debug!(
            subject = %subject.canonical_uri,
            broadcasts = considered,
            candidates = found.len(),
            "broadcast matching"
        );
        Ok(found)
    }
}
