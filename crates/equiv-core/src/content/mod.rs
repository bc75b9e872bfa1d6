//! Content model: the read-only metadata records the pipeline compares.

mod alias;
mod broadcast;
mod record;
mod publisher;

pub use alias::Alias;
pub use broadcast::Broadcast;
pub use record::{Content, ContentShape, MediaType, ParentRef, Specialization};
pub use publisher::Publisher;
