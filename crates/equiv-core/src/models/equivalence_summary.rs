use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::Publisher;

/// Accepted equivalent as recorded in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRef {
    pub uri: String,
    #[serde(default)]
    pub id: Option<u64>,
    pub publisher: Publisher,
    /// The equivalent's own container, if any.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Cached outcome of the last run for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceSummary {
    pub subject: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Every candidate the last run considered, accepted or not.
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub equivalents: BTreeMap<Publisher, Vec<SummaryRef>>,
}

impl EquivalenceSummary {
    pub fn new(subject: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            parent,
            candidates: Vec::new(),
            equivalents: BTreeMap::new(),
        }
    }

    pub fn equivalents_for(&self, publisher: &Publisher) -> &[SummaryRef] {
        self.equivalents
            .get(publisher)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_equivalents(&self) -> impl Iterator<Item = &SummaryRef> {
        self.equivalents.values().flatten()
    }
}
