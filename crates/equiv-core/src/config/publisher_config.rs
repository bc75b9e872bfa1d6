use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Pipeline used for items of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemProfile {
    /// Broadcast + title search, averaged, clear-winner extraction.
    #[default]
    Standard,
    /// Title search only, additive, with a multiple-candidate fallback.
    Vod,
    /// Alias matching only.
    Alias,
    /// Film search on title and year, plus exact-title search.
    Film,
    /// Broadcasts only, confirmed by title and description agreement.
    Broadcast,
    Disabled,
}

/// Pipeline used for containers of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerProfile {
    /// Title search + child propagation, gated on the title scorer.
    #[default]
    Standard,
    /// Title search only, for catalogues whose items carry no schedule.
    Vod,
    Alias,
    Disabled,
}

/// How strictly an episode's candidates must agree with its container's equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyMode {
    /// The candidate's container must be among the container's equivalents.
    #[default]
    Strict,
    /// As strict, but publishers with no container equivalent pass.
    Relaxed,
}

/// One row of the per-publisher configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherProfile {
    pub publisher: String,
    /// Publishers whose content may be accepted as equivalent.
    pub targets: Vec<String>,
    #[serde(default)]
    pub item: ItemProfile,
    #[serde(default)]
    pub top_level_container: ContainerProfile,
    #[serde(default = "disabled_container")]
    pub non_top_level_container: ContainerProfile,
    /// Alias namespaces treated as interchangeable, one group per entry.
    #[serde(default)]
    pub alias_namespaces: Vec<Vec<String>>,
    #[serde(default)]
    pub hierarchy: HierarchyMode,
    /// Channels whose broadcasts the title scorer abstains on.
    #[serde(default)]
    pub null_score_channels: Vec<String>,
}

fn disabled_container() -> ContainerProfile {
    ContainerProfile::Disabled
}

impl PublisherProfile {
    pub fn new(publisher: impl Into<String>, targets: &[&str]) -> Self {
        Self {
            publisher: publisher.into(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            item: ItemProfile::Standard,
            top_level_container: ContainerProfile::Standard,
            non_top_level_container: ContainerProfile::Disabled,
            alias_namespaces: Vec::new(),
            hierarchy: HierarchyMode::Strict,
            null_score_channels: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("publishers.{}.targets", self.publisher),
                reason: "at least one target publisher is required".into(),
            });
        }
        let mut seen = HashSet::new();
        for namespace in self.alias_namespaces.iter().flatten() {
            if !seen.insert(namespace.as_str()) {
                return Err(ConfigError::OverlappingNamespaces {
                    namespace: namespace.clone(),
                });
            }
        }
        Ok(())
    }
}
