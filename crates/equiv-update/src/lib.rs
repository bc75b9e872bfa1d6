//! # equiv-update
//!
//! Runs the equivalence pipeline for one subject and persists the outcome.
//!
//! - [`ContentEquivalenceUpdater`]: generate → score → combine → filter →
//!   extract → handle, with per-run stage tracking.
//! - [`EquivalenceUpdaters`]: one updater per (publisher, shape), built from
//!   the publisher profile table.
//! - [`EquivalenceUpdatingWorker`]: notification entry point with slot locks,
//!   a recently-processed cache and the single dependency retry.
//! - [`ContentEquivalenceUpdateTask`]: stoppable, resumable catalogue re-scan.
//! - [`ScheduleEquivalenceUpdateTask`]: re-runs what a set of channels
//!   broadcast over a window of days.
//! - [`EquivalenceService`]: the exposed surface.

pub mod configuration;
pub mod handlers;
pub mod observability;
pub mod outcome;
pub mod recent;
pub mod schedule_task;
pub mod service;
pub mod slot_locks;
pub mod task;
pub mod updater;
pub mod worker;

pub use configuration::{EquivalenceUpdaters, UpdaterConfiguration, UpdaterDependencies};
pub use outcome::{UpdateOutcome, UpdateReport, UpdateStage};
pub use recent::{RecentResultStore, RecentlyProcessed};
pub use schedule_task::{ScheduleEquivalenceUpdateTask, ScheduleReport};
pub use service::{EquivalenceService, ProcessReport, ServiceDependencies};
pub use slot_locks::{SlotGuard, SlotLocks};
pub use task::{ContentEquivalenceUpdateTask, ScanReport};
pub use updater::ContentEquivalenceUpdater;
pub use worker::{EquivalenceUpdatingWorker, SkipReason, WorkOutcome};
