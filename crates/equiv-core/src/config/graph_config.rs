use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Equivalence graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Components above this size get their closure recomputed lazily.
    pub max_transitive_set_size: usize,
    /// Deferred closures are refreshed after this many writes touch them.
    pub recompute_after_writes: u32,
    /// ...or once they have been pending this long (seconds).
    pub recompute_after_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_transitive_set_size: defaults::DEFAULT_MAX_TRANSITIVE_SET_SIZE,
            recompute_after_writes: defaults::DEFAULT_RECOMPUTE_AFTER_WRITES,
            recompute_after_secs: defaults::DEFAULT_RECOMPUTE_AFTER_SECS,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transitive_set_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "graph.max_transitive_set_size".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}
