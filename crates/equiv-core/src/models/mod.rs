//! Value records passed between pipeline stages and to collaborators.

mod assertion_message;
mod equivalence_result;
mod equivalence_summary;
mod handling;
mod notification;
mod stored_result;

pub use assertion_message::{AssertedRef, EquivalenceAssertionMessage};
pub use equivalence_result::EquivalenceResults;
pub use equivalence_summary::{EquivalenceSummary, SummaryRef};
pub use handling::{HandleOutcome, HandlerFailure};
pub use notification::EquivalenceNotification;
pub use stored_result::StoredEquivalenceResult;
