/// Equivalence-graph consistency violations. A rejected operation writes nothing.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid source uri {uri}: no lookup entry")]
    SubjectNotFound { uri: String },

    #[error("direct equivalence from {subject} to {target} not found")]
    EdgeNotFound { subject: String, target: String },

    #[error("target {uri} not resolvable")]
    TargetNotFound { uri: String },

    #[error("write for {subject} rejected: {reason}")]
    WriteRejected { subject: String, reason: String },
}
