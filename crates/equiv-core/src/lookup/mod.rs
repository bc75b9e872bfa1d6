//! Equivalence graph records: refs, directed edge sets, and per-uri entries.
//!
//! Edges are plain values keyed by uri. Nodes are always looked up through a
//! store; nothing here holds a reference to another entry.

mod entry;
mod equiv_refs;
mod lookup_ref;

pub use entry::LookupEntry;
pub use equiv_refs::{Direction, EquivRef, EquivRefs};
pub use lookup_ref::{ContentCategory, LookupRef};
