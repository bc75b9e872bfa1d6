/// Invalid configuration, detected when an updater or strategy is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("alias namespace {namespace} appears in more than one namespace group")]
    OverlappingNamespaces { namespace: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown strategy {name} for {shape}")]
    UnknownStrategy { name: String, shape: String },
}
