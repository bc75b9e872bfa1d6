use std::collections::BTreeMap;

use crate::errors::EquivResult;
use crate::models::{EquivalenceAssertionMessage, EquivalenceSummary, StoredEquivalenceResult};

/// Per-uri summaries of the last run.
pub trait IEquivalenceSummaryStore: Send + Sync {
    fn summaries_for(&self, uris: &[String]) -> EquivResult<BTreeMap<String, EquivalenceSummary>>;

    fn store(&self, summary: EquivalenceSummary) -> EquivResult<()>;
}

/// Audit record persistence.
pub trait IResultStore: Send + Sync {
    fn store(&self, result: StoredEquivalenceResult) -> EquivResult<()>;

    fn for_uri(&self, uri: &str) -> EquivResult<Option<StoredEquivalenceResult>>;
}

/// Outbound message transport.
pub trait IMessageSender: Send + Sync {
    fn send(&self, message: &EquivalenceAssertionMessage) -> EquivResult<()>;
}

/// Persistence of resumable task cursors.
pub trait IProgressStore: Send + Sync {
    /// Saved cursor for `task`; 0 when none was saved.
    fn load(&self, task: &str) -> EquivResult<u64>;

    fn save(&self, task: &str, cursor: u64) -> EquivResult<()>;
}
