use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::content::{Content, ContentShape, Publisher};
use crate::errors::EquivResult;

/// Content storage, read side.
pub trait IContentResolver: Send + Sync {
    /// Resolve by uri. Unknown uris are omitted from the result.
    fn resolve_uris(&self, uris: &[String]) -> EquivResult<Vec<Arc<Content>>>;

    /// Resolve by numeric id. Unknown ids are omitted from the result.
    fn resolve_ids(&self, ids: &[u64]) -> EquivResult<Vec<Arc<Content>>>;

    /// Resolve a single uri.
    fn resolve_uri(&self, uri: &str) -> EquivResult<Option<Arc<Content>>> {
        Ok(self.resolve_uris(&[uri.to_string()])?.into_iter().next())
    }
}

/// Paged listing of a publisher's catalogue in id order.
pub trait IContentLister: Send + Sync {
    /// Up to `limit` items of `publishers` with id strictly greater than `after_id`.
    fn list(
        &self,
        publishers: &[Publisher],
        after_id: u64,
        limit: usize,
    ) -> EquivResult<Vec<Arc<Content>>>;
}

/// Title query against the search collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub title: String,
    pub publishers: Vec<Publisher>,
    /// Only content of these shapes is wanted; empty means any.
    pub shapes: Vec<ContentShape>,
    pub limit: usize,
}

/// Full-text search over titles.
pub trait ISearchResolver: Send + Sync {
    fn search(&self, query: &SearchQuery) -> EquivResult<Vec<Arc<Content>>>;
}

/// Broadcast schedule lookups.
pub trait IScheduleResolver: Send + Sync {
    /// Items of `publishers` broadcast on `channel` between `from` and `to`.
    fn schedule(
        &self,
        channel: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        publishers: &[Publisher],
    ) -> EquivResult<Vec<Arc<Content>>>;
}
