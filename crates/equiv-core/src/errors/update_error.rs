/// Orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("no updater configured for publisher {publisher} and shape {shape}")]
    NoConfiguration { publisher: String, shape: String },

    #[error("handler {handler} failed for {subject}: {reason}")]
    HandlerFailure {
        handler: String,
        subject: String,
        reason: String,
    },

    #[error("dependency {container} of {subject} still missing after retry")]
    DependencyUnresolved { subject: String, container: String },

    #[error("update already in progress for {key}")]
    AlreadyRunning { key: String },
}
