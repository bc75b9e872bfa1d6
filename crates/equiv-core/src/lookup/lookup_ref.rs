use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentShape, Publisher};

/// Coarse category recorded on every ref so consumers can filter without
/// resolving content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    TopLevelItem,
    ChildItem,
    Container,
    ProgrammeGroup,
}

impl ContentCategory {
    pub fn of(content: &Content) -> Self {
        match content.shape {
            ContentShape::Item if content.container.is_some() => ContentCategory::ChildItem,
            ContentShape::Item => ContentCategory::TopLevelItem,
            ContentShape::TopLevelContainer => ContentCategory::Container,
            ContentShape::NonTopLevelContainer => ContentCategory::ProgrammeGroup,
        }
    }
}

/// Pointer to a node in the equivalence graph.
///
/// Identity is the uri alone: a ref with a backfilled id is the same ref.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRef {
    pub uri: String,
    #[serde(default)]
    pub id: Option<u64>,
    pub publisher: Publisher,
    pub category: ContentCategory,
}

impl LookupRef {
    pub fn new(
        uri: impl Into<String>,
        id: Option<u64>,
        publisher: Publisher,
        category: ContentCategory,
    ) -> Self {
        Self {
            uri: uri.into(),
            id,
            publisher,
            category,
        }
    }

    pub fn from_content(content: &Content) -> Self {
        Self::new(
            content.canonical_uri.clone(),
            content.id,
            content.publisher.clone(),
            ContentCategory::of(content),
        )
    }

    pub fn with_id(&self, id: u64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }
}

impl PartialEq for LookupRef {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for LookupRef {}

impl Hash for LookupRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl PartialOrd for LookupRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LookupRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri)
    }
}
