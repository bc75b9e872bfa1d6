//! Stages and typed outcomes of one updater run.

use std::fmt;

use equiv_core::models::{HandlerFailure, StoredEquivalenceResult};

/// Where a run is. `Failed` is terminal and reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateStage {
    Idle,
    Generating,
    Scoring,
    Combining,
    Filtering,
    Extracting,
    Handling,
    Done,
    Failed,
}

impl UpdateStage {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateStage::Idle => "idle",
            UpdateStage::Generating => "generating",
            UpdateStage::Scoring => "scoring",
            UpdateStage::Combining => "combining",
            UpdateStage::Filtering => "filtering",
            UpdateStage::Extracting => "extracting",
            UpdateStage::Handling => "handling",
            UpdateStage::Done => "done",
            UpdateStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UpdateStage::Done | UpdateStage::Failed)
    }

    /// The stage after this one on the success path.
    pub fn next(&self) -> UpdateStage {
        match self {
            UpdateStage::Idle => UpdateStage::Generating,
            UpdateStage::Generating => UpdateStage::Scoring,
            UpdateStage::Scoring => UpdateStage::Combining,
            UpdateStage::Combining => UpdateStage::Filtering,
            UpdateStage::Filtering => UpdateStage::Extracting,
            UpdateStage::Extracting => UpdateStage::Handling,
            UpdateStage::Handling | UpdateStage::Done => UpdateStage::Done,
            UpdateStage::Failed => UpdateStage::Failed,
        }
    }
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub subject_uri: String,
    /// Which configuration ran.
    pub updater: String,
    /// The graph was mutated.
    pub changed: bool,
    pub audit: StoredEquivalenceResult,
    /// Sources that failed and contributed nothing.
    pub abstained_sources: Vec<String>,
    /// Handlers or messengers that failed after the graph decision was made.
    pub failures: Vec<HandlerFailure>,
    pub stage: UpdateStage,
}

/// Typed result of [`crate::ContentEquivalenceUpdater::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The pipeline ran to the end.
    Completed(UpdateReport),
    /// No source proposed any candidate. Handlers still ran with nothing accepted.
    Abstained(UpdateReport),
    /// The subject's container must be equivalated first. Nothing was written.
    DependencyMissing { container_uri: String },
}

impl UpdateOutcome {
    pub fn changed(&self) -> bool {
        self.report().is_some_and(|r| r.changed)
    }

    pub fn report(&self) -> Option<&UpdateReport> {
        match self {
            UpdateOutcome::Completed(report) | UpdateOutcome::Abstained(report) => Some(report),
            UpdateOutcome::DependencyMissing { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<UpdateReport> {
        match self {
            UpdateOutcome::Completed(report) | UpdateOutcome::Abstained(report) => Some(report),
            UpdateOutcome::DependencyMissing { .. } => None,
        }
    }

    pub fn missing_dependency(&self) -> Option<&str> {
        match self {
            UpdateOutcome::DependencyMissing { container_uri } => Some(container_uri),
            _ => None,
        }
    }
}
