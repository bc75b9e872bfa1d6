use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{Content, Publisher};
use crate::models::EquivalenceResults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertedRef {
    pub uri: String,
    #[serde(default)]
    pub id: Option<u64>,
    pub publisher: Publisher,
}

impl AssertedRef {
    pub fn of(content: &Content) -> Self {
        Self {
            uri: content.canonical_uri.clone(),
            id: content.id,
            publisher: content.publisher.clone(),
        }
    }
}

/// Outbound change notification: the subject now asserts these candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceAssertionMessage {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub subject: AssertedRef,
    pub assertions: Vec<AssertedRef>,
    pub publishers: Vec<Publisher>,
}

impl EquivalenceAssertionMessage {
    pub fn from_results(
        results: &EquivalenceResults,
        publishers: Vec<Publisher>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            timestamp: now,
            subject: AssertedRef::of(&results.subject),
            assertions: results
                .accepted_candidates()
                .map(|c| AssertedRef::of(&c.candidate))
                .collect(),
            publishers,
        }
    }
}
