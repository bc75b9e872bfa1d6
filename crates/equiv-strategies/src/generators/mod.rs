//! Generators: search collaborators for candidates and give first scores.

mod alias;
mod broadcast;
mod container_candidates;
mod container_child;
mod exact_title;
mod film;
mod scaling;
mod title_search;

pub use alias::AliasResolvingGenerator;
pub use broadcast::BroadcastMatchingGenerator;
pub use container_candidates::ContainerCandidatesItemGenerator;
pub use container_child::ContainerChildGenerator;
pub use exact_title::{needs_exact_match, ExactTitleGenerator};
pub use film::FilmEquivalenceGenerator;
pub use scaling::ScalingGenerator;
pub use title_search::TitleSearchGenerator;
