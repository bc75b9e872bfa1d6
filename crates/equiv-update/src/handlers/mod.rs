//! Result handlers: the side effects of a finished run.
//!
//! Handlers see the accepted set after extraction. [`DelegatingHandler`]
//! fans out to a chain and keeps going past individual failures;
//! [`EpisodeFilteringHandler`] wraps a chain and may stop the run with a
//! dependency-missing outcome before anything is written.

mod delegating;
mod episode_filtering;
mod episode_matching;
mod lookup_writing;
mod messenger;
mod result_writing;
mod summary_writing;

pub use delegating::DelegatingHandler;
pub use episode_filtering::EpisodeFilteringHandler;
pub use episode_matching::EpisodeMatchingHandler;
pub use lookup_writing::LookupWritingHandler;
pub use messenger::AssertionMessenger;
pub use result_writing::ResultWritingHandler;
pub use summary_writing::SummaryWritingHandler;
