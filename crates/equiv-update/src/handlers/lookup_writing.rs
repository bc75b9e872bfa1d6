use std::collections::BTreeSet;
use std::sync::Arc;

use equiv_core::models::{EquivalenceResults, HandleOutcome};
use equiv_core::traits::{ILookupEntryStore, ILookupWriter, IResultHandler};
use equiv_core::{EquivResult, LookupRef, Publisher};
use tracing::debug;

/// Writes the accepted set into the equivalence graph.
///
/// Entries are created for the subject and every accepted candidate first,
/// so the writer never sees an unknown target.
pub struct LookupWritingHandler {
    lookups: Arc<dyn ILookupEntryStore>,
    writer: Arc<dyn ILookupWriter>,
    publishers: BTreeSet<Publisher>,
}

impl LookupWritingHandler {
    pub fn new(
        lookups: Arc<dyn ILookupEntryStore>,
        writer: Arc<dyn ILookupWriter>,
        publishers: impl IntoIterator<Item = Publisher>,
    ) -> Self {
        Self {
            lookups,
            writer,
            publishers: publishers.into_iter().collect(),
        }
    }
}

impl IResultHandler for LookupWritingHandler {
    fn name(&self) -> &str {
        "lookup writer"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        let subject = self.lookups.ensure_lookup(&results.subject)?;
        let equivalents: Vec<LookupRef> = results
            .accepted_candidates()
            .map(|c| self.lookups.ensure_lookup(&c.candidate).map(|e| e.self_ref))
            .collect::<EquivResult<_>>()?;

        let changed = self
            .writer
            .write_lookup(&subject.self_ref, &equivalents, &self.publishers)?;
        debug!(
            subject = %subject.uri,
            equivalents = equivalents.len(),
            changed = changed.as_ref().map_or(0, Vec::len),
            "lookup written"
        );
        Ok(HandleOutcome::changed(changed.is_some()))
    }
}
