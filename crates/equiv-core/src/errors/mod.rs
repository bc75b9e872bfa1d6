//! Error types for every subsystem, aggregated into [`EquivError`].

mod config_error;
mod graph_error;
mod store_error;
mod strategy_error;
mod update_error;

pub use config_error::ConfigError;
pub use graph_error::GraphError;
pub use store_error::StoreError;
pub use strategy_error::StrategyError;
pub use update_error::UpdateError;

/// Top-level error for the equivalence engine.
#[derive(Debug, thiserror::Error)]
pub enum EquivError {
    #[error("content not found: {uri}")]
    ContentNotFound { uri: String },

    #[error("no content for id {id}")]
    IdNotFound { id: u64 },

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("update error: {0}")]
    UpdateError(#[from] UpdateError),

    #[error("strategy error: {0}")]
    StrategyError(#[from] StrategyError),

    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type EquivResult<T> = Result<T, EquivError>;
