use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Whether extraction runs per candidate publisher or once over the whole pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionScope {
    #[default]
    PerPublisher,
    WholePool,
}

/// Pipeline tuning shared by the built-in publisher profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Combined score a candidate needs to survive filtering.
    pub minimum_score: f64,
    /// Factor the top candidate must beat the runner-up by.
    pub n_times_greater: f64,
    /// Start-time tolerance when matching broadcasts (minutes).
    pub broadcast_flexibility_mins: i64,
    pub title_search_limit: usize,
    /// Title similarity below which search hits are discarded.
    pub title_similarity_floor: f64,
    pub item_title_match_score: f64,
    pub container_title_match_score: f64,
    pub sequence_match_score: f64,
    pub alias_match_score: f64,
    /// Multiplier applied to hierarchy-propagation scores for containers.
    pub container_child_scale: f64,
    /// Years films may differ by and still match.
    pub film_year_tolerance: u16,
    /// Score band below the leader inside which multiple candidates are accepted.
    pub multiple_candidate_band: f64,
    /// Share of the shorter title's words the longer one must contain for
    /// two broadcast titles to count as the same programme (percent).
    pub broadcast_title_subset_percent: u8,
    /// Shared capitalised description words needed, as a share of all of them.
    pub description_overlap: f64,
    /// A title matches a description when more than `1 / divisor` of its
    /// words appear there.
    pub description_title_divisor: f64,
    pub extraction_scope: ExtractionScope,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            minimum_score: defaults::DEFAULT_MINIMUM_SCORE,
            n_times_greater: defaults::DEFAULT_N_TIMES_GREATER,
            broadcast_flexibility_mins: defaults::DEFAULT_BROADCAST_FLEXIBILITY_MINS,
            title_search_limit: defaults::DEFAULT_TITLE_SEARCH_LIMIT,
            title_similarity_floor: defaults::DEFAULT_TITLE_SIMILARITY_FLOOR,
            item_title_match_score: defaults::DEFAULT_ITEM_TITLE_MATCH_SCORE,
            container_title_match_score: defaults::DEFAULT_CONTAINER_TITLE_MATCH_SCORE,
            sequence_match_score: defaults::DEFAULT_SEQUENCE_MATCH_SCORE,
            alias_match_score: defaults::DEFAULT_ALIAS_MATCH_SCORE,
            container_child_scale: defaults::DEFAULT_CONTAINER_CHILD_SCALE,
            film_year_tolerance: defaults::DEFAULT_FILM_YEAR_TOLERANCE,
            multiple_candidate_band: defaults::DEFAULT_MULTIPLE_CANDIDATE_BAND,
            broadcast_title_subset_percent: defaults::DEFAULT_BROADCAST_TITLE_SUBSET_PERCENT,
            description_overlap: defaults::DEFAULT_DESCRIPTION_OVERLAP,
            description_title_divisor: defaults::DEFAULT_DESCRIPTION_TITLE_DIVISOR,
            extraction_scope: ExtractionScope::default(),
        }
    }
}

impl UpdateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_times_greater < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "update.n_times_greater".into(),
                reason: format!("must be at least 1.0, got {}", self.n_times_greater),
            });
        }
        if self.broadcast_flexibility_mins < 0 {
            return Err(ConfigError::InvalidValue {
                field: "update.broadcast_flexibility_mins".into(),
                reason: "must not be negative".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.title_similarity_floor) {
            return Err(ConfigError::InvalidValue {
                field: "update.title_similarity_floor".into(),
                reason: "must lie in [0, 1]".into(),
            });
        }
        if self.broadcast_title_subset_percent > 100 {
            return Err(ConfigError::InvalidValue {
                field: "update.broadcast_title_subset_percent".into(),
                reason: format!("must lie in [0, 100], got {}", self.broadcast_title_subset_percent),
            });
        }
        if self.description_title_divisor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "update.description_title_divisor".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}
