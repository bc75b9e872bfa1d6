use std::collections::BTreeSet;

use crate::content::{Alias, Content, Publisher};
use crate::errors::EquivResult;
use crate::lookup::{LookupEntry, LookupRef};

/// Storage of lookup entries, the nodes of the equivalence graph.
pub trait ILookupEntryStore: Send + Sync {
    /// Entries for the given uris; unknown uris are omitted.
    fn entries_for_uris(&self, uris: &[String]) -> EquivResult<Vec<LookupEntry>>;

    /// Entries for the given ids; unknown ids are omitted.
    fn entries_for_ids(&self, ids: &[u64]) -> EquivResult<Vec<LookupEntry>>;

    /// Entries carrying any of the given aliases.
    fn entries_for_aliases(&self, aliases: &[Alias]) -> EquivResult<Vec<LookupEntry>>;

    /// Insert or replace an entry.
    fn store(&self, entry: LookupEntry) -> EquivResult<()>;

    /// The entry for `content`, created on first sight.
    fn ensure_lookup(&self, content: &Content) -> EquivResult<LookupEntry>;

    /// Up to `limit` entries with id strictly greater than `after_id`, ascending.
    fn entries_after(&self, after_id: u64, limit: usize) -> EquivResult<Vec<LookupEntry>>;
}

/// Writes an accepted set into the graph.
pub trait ILookupWriter: Send + Sync {
    /// Make `equivalents` the subject's edges towards `publishers`.
    ///
    /// Returns the entries that changed, or `None` when the write was a no-op.
    fn write_lookup(
        &self,
        subject: &LookupRef,
        equivalents: &[LookupRef],
        publishers: &BTreeSet<Publisher>,
    ) -> EquivResult<Option<Vec<LookupEntry>>>;
}
