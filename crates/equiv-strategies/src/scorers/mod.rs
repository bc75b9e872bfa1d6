//! Scorers: opinions on candidates some generator already proposed.

mod broadcast_title;
mod description;
mod hierarchy;
mod sequence;
mod title;

pub use broadcast_title::BroadcastTitleSubsetScorer;
pub use description::{DescriptionMatchingScorer, DescriptionTitleMatchingScorer};
pub use hierarchy::ContainerHierarchyScorer;
pub use sequence::SequenceItemScorer;
pub use title::TitleMatchingScorer;
