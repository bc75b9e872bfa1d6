//! # equiv-results
//!
//! Turns per-source candidate sets into an accepted set.
//! Combining → Filtering → Extracting, assembled by [`EquivalenceResultBuilder`].

pub mod builder;
pub mod combining;
pub mod extraction;
pub mod filtering;

pub use builder::EquivalenceResultBuilder;
