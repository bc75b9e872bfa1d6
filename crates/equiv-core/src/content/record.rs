use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Alias, Broadcast, Publisher};

/// Structural position of a piece of content. Pipeline configuration is
/// selected by (publisher, shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentShape {
    /// Episodes, films, clips.
    Item,
    /// Brands and stand-alone series.
    TopLevelContainer,
    /// Series that belong to a brand.
    NonTopLevelContainer,
}

impl ContentShape {
    pub const ALL: [ContentShape; 3] = [
        ContentShape::Item,
        ContentShape::TopLevelContainer,
        ContentShape::NonTopLevelContainer,
    ];

    pub fn is_container(&self) -> bool {
        !matches!(self, ContentShape::Item)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContentShape::Item => "item",
            ContentShape::TopLevelContainer => "top_level_container",
            ContentShape::NonTopLevelContainer => "non_top_level_container",
        }
    }
}

impl fmt::Display for ContentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    Film,
    Tv,
    Radio,
    Music,
    Clip,
}

/// Pointer from content to its parent container or series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub uri: String,
    #[serde(default)]
    pub id: Option<u64>,
}

impl ParentRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            id: None,
        }
    }
}

/// A metadata record from one publisher. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Numeric id; `None` until the store assigns one.
    #[serde(default)]
    pub id: Option<u64>,
    pub canonical_uri: String,
    pub publisher: Publisher,
    pub shape: ContentShape,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub specialization: Option<Specialization>,
    #[serde(default)]
    pub year: Option<u16>,
    /// Item → brand/series, series → brand.
    #[serde(default)]
    pub container: Option<ParentRef>,
    /// Item → series, when the item sits under a brand.
    #[serde(default)]
    pub series: Option<ParentRef>,
    #[serde(default)]
    pub series_number: Option<u32>,
    #[serde(default)]
    pub episode_number: Option<u32>,
    /// Uris of items directly below a container.
    #[serde(default)]
    pub children: Vec<String>,
    /// Uris of series below a brand.
    #[serde(default)]
    pub series_refs: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeSet<Alias>,
    #[serde(default)]
    pub alias_uris: BTreeSet<String>,
    #[serde(default)]
    pub broadcasts: Vec<Broadcast>,
    #[serde(default = "default_true")]
    pub actively_published: bool,
    /// Synthesised stand-in container created during ingest.
    #[serde(default)]
    pub placeholder: bool,
}

fn default_true() -> bool {
    true
}

impl Content {
    pub fn new(uri: impl Into<String>, publisher: impl Into<Publisher>, shape: ContentShape) -> Self {
        Self {
            id: None,
            canonical_uri: uri.into(),
            publisher: publisher.into(),
            shape,
            title: None,
            description: None,
            media_type: MediaType::Video,
            specialization: None,
            year: None,
            container: None,
            series: None,
            series_number: None,
            episode_number: None,
            children: Vec::new(),
            series_refs: Vec::new(),
            aliases: BTreeSet::new(),
            alias_uris: BTreeSet::new(),
            broadcasts: Vec::new(),
            actively_published: true,
            placeholder: false,
        }
    }

    pub fn item(uri: impl Into<String>, publisher: impl Into<Publisher>) -> Self {
        Self::new(uri, publisher, ContentShape::Item)
    }

    pub fn brand(uri: impl Into<String>, publisher: impl Into<Publisher>) -> Self {
        Self::new(uri, publisher, ContentShape::TopLevelContainer)
    }

    pub fn series(uri: impl Into<String>, publisher: impl Into<Publisher>) -> Self {
        Self::new(uri, publisher, ContentShape::NonTopLevelContainer)
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_specialization(mut self, specialization: Specialization) -> Self {
        self.specialization = Some(specialization);
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_container(mut self, uri: impl Into<String>) -> Self {
        self.container = Some(ParentRef::new(uri));
        self
    }

    pub fn with_series(mut self, uri: impl Into<String>, series_number: Option<u32>) -> Self {
        self.series = Some(ParentRef::new(uri));
        self.series_number = series_number;
        self
    }

    pub fn with_episode_number(mut self, episode_number: u32) -> Self {
        self.episode_number = Some(episode_number);
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_series_refs<I, S>(mut self, series: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.series_refs = series.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alias(mut self, alias: Alias) -> Self {
        self.aliases.insert(alias);
        self
    }

    pub fn with_broadcast(mut self, broadcast: Broadcast) -> Self {
        self.broadcasts.push(broadcast);
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.actively_published = false;
        self
    }

    pub fn as_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// Display label for logs and audit trails.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("{} ({})", title, self.canonical_uri),
            None => self.canonical_uri.clone(),
        }
    }

    /// Uri of the series this item sits in, falling back to its container.
    pub fn series_or_container_uri(&self) -> Option<&str> {
        self.series
            .as_ref()
            .or(self.container.as_ref())
            .map(|p| p.uri.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "canonical_uri": "http://a.example/1",
            "publisher": "a.example",
            "shape": "item"
        }"#;
        let content: Content = serde_json::from_str(json).unwrap();
        assert!(content.actively_published);
        assert!(!content.placeholder);
        assert_eq!(content.media_type, MediaType::Video);
        assert_eq!(content.publisher.key(), "a.example");
    }

    #[test]
    fn label_prefers_title() {
        let c = Content::item("u1", "p").with_title("Doctor Who");
        assert_eq!(c.label(), "Doctor Who (u1)");
        assert_eq!(Content::item("u2", "p").label(), "u2");
    }
}
