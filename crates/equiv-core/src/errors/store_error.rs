/// Failures reported by external collaborators (stores, resolvers, transports).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable { collaborator: String, reason: String },

    #[error("{collaborator} rejected write for {key}: {reason}")]
    WriteFailed {
        collaborator: String,
        key: String,
        reason: String,
    },
}
