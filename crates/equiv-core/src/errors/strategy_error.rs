/// Generator and scorer failures. The orchestrator turns these into abstentions.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("source {source_name} failed for {subject}: {reason}")]
    SourceFailed {
        source_name: String,
        subject: String,
        reason: String,
    },

    #[error("source {source_name} cannot handle {shape} subjects")]
    UnsupportedShape { source_name: String, shape: String },
}
