//! # equiv-graph
//!
//! The equivalence graph. Nodes are [`LookupEntry`](equiv_core::LookupEntry)
//! records keyed by uri; edges are plain value records on each node.
//!
//! - [`InMemoryLookupEntryStore`]: concurrent entry storage.
//! - [`TransitiveLookupWriter`]: writes accepted sets and maintains closures.
//! - [`EquivalenceBreaker`]: removes edges on request.
//! - [`LookupRefBackfill`]: fills missing ids across the whole graph.

pub mod backfill;
pub mod breaker;
pub mod component;
pub mod staleness;
pub mod store;
pub mod writer;

pub use backfill::{BackfillReport, LookupRefBackfill};
pub use breaker::EquivalenceBreaker;
pub use staleness::StaleClosureTracker;
pub use store::InMemoryLookupEntryStore;
pub use writer::{TransitiveLookupWriter, WriteMode};
