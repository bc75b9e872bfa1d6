//! Seams of the engine: external collaborators and pipeline stages.

mod content;
mod lookup;
mod persistence;
mod pipeline;

pub use content::{IContentLister, IContentResolver, IScheduleResolver, ISearchResolver, SearchQuery};
pub use lookup::{ILookupEntryStore, ILookupWriter};
pub use persistence::{IEquivalenceSummaryStore, IMessageSender, IProgressStore, IResultStore};
pub use pipeline::{
    IEquivalenceExtractor, IEquivalenceFilter, IEquivalenceGenerator, IEquivalenceScorer,
    IResultHandler, IScoreCombiner,
};
