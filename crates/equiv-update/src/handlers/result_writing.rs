use std::sync::Arc;

use chrono::Utc;
use equiv_core::models::{EquivalenceResults, HandleOutcome, StoredEquivalenceResult};
use equiv_core::traits::{IResultHandler, IResultStore};
use equiv_core::EquivResult;

/// Persists the audit record of the run.
pub struct ResultWritingHandler {
    store: Arc<dyn IResultStore>,
}

impl ResultWritingHandler {
    pub fn new(store: Arc<dyn IResultStore>) -> Self {
        Self { store }
    }
}

impl IResultHandler for ResultWritingHandler {
    fn name(&self) -> &str {
        "result writer"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        self.store
            .store(StoredEquivalenceResult::from_results(results, Utc::now()))?;
        Ok(HandleOutcome::unchanged())
    }
}
