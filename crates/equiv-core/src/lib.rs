//! # equiv-core
//!
//! Foundation crate for the content equivalence engine.
//! Defines the score and candidate model, content and lookup-graph records,
//! collaborator and pipeline traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod candidates;
pub mod config;
pub mod constants;
pub mod content;
pub mod description;
pub mod errors;
pub mod lookup;
pub mod models;
pub mod score;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use candidates::{ScoredCandidate, ScoredCandidates};
pub use config::EquivConfig;
pub use content::{Content, ContentShape, Publisher};
pub use description::AuditTrail;
pub use errors::{EquivError, EquivResult};
pub use lookup::{Direction, EquivRefs, LookupEntry, LookupRef};
pub use score::{Score, ScoreThreshold};
