//! # equiv-strategies
//!
//! The sources of the pipeline. Generators search collaborators for
//! candidates; scorers give an opinion on candidates someone else found.
//! Every source stamps its output with a stable name so combiners and
//! gating rules can refer to it.

pub mod generators;
pub mod scorers;
pub mod titles;

pub use generators::{
    AliasResolvingGenerator, BroadcastMatchingGenerator, ContainerCandidatesItemGenerator,
    ContainerChildGenerator, ExactTitleGenerator, FilmEquivalenceGenerator, ScalingGenerator,
    TitleSearchGenerator,
};
pub use scorers::{
    BroadcastTitleSubsetScorer, ContainerHierarchyScorer, DescriptionMatchingScorer,
    DescriptionTitleMatchingScorer, SequenceItemScorer, TitleMatchingScorer,
};
