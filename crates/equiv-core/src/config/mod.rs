//! Configuration: every section deserializes from TOML with full defaults.

pub mod defaults;
mod graph_config;
mod observability_config;
mod publisher_config;
mod task_config;
mod update_config;

pub use graph_config::GraphConfig;
pub use observability_config::ObservabilityConfig;
pub use publisher_config::{ContainerProfile, HierarchyMode, ItemProfile, PublisherProfile};
pub use task_config::{BackfillConfig, ScanConfig, ScheduleConfig, WorkerConfig};
pub use update_config::{ExtractionScope, UpdateConfig};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, EquivResult};

/// Root configuration for the equivalence engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivConfig {
    pub update: UpdateConfig,
    pub graph: GraphConfig,
    pub worker: WorkerConfig,
    pub scan: ScanConfig,
    pub schedule: ScheduleConfig,
    pub backfill: BackfillConfig,
    pub observability: ObservabilityConfig,
    /// Per-publisher pipeline table. Empty means the built-in table.
    pub publishers: Vec<PublisherProfile>,
}

impl Default for EquivConfig {
    fn default() -> Self {
        Self {
            update: UpdateConfig::default(),
            graph: GraphConfig::default(),
            worker: WorkerConfig::default(),
            scan: ScanConfig::default(),
            schedule: ScheduleConfig::default(),
            backfill: BackfillConfig::default(),
            observability: ObservabilityConfig::default(),
            publishers: Vec::new(),
        }
    }
}

impl EquivConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> EquivResult<Self> {
        let config: EquivConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.update.validate()?;
        self.graph.validate()?;
        for profile in &self.publishers {
            profile.validate()?;
        }
        Ok(())
    }
}
