//! EquivalenceService: owns the graph writer, the updater table, the worker,
//! the re-scan and schedule tasks and the backfill, and exposes them as one surface.

use std::sync::Arc;

use chrono::Utc;
use equiv_core::config::EquivConfig;
use equiv_core::models::{EquivalenceNotification, StoredEquivalenceResult};
use equiv_core::traits::{
    IContentLister, IContentResolver, IEquivalenceSummaryStore, ILookupEntryStore, ILookupWriter,
    IMessageSender, IProgressStore, IResultStore, IScheduleResolver, ISearchResolver,
};
use equiv_core::{EquivResult, LookupEntry, Publisher};
use equiv_graph::{EquivalenceBreaker, LookupRefBackfill, TransitiveLookupWriter};
use tracing::info;

use crate::configuration::{EquivalenceUpdaters, UpdaterDependencies};
use crate::observability;
use crate::outcome::UpdateOutcome;
use crate::recent::{RecentResultStore, RecentlyProcessed};
use crate::schedule_task::{ScheduleEquivalenceUpdateTask, ScheduleReport};
use crate::slot_locks::SlotLocks;
use crate::task::{ContentEquivalenceUpdateTask, ScanReport};
use crate::worker::{EquivalenceUpdatingWorker, SkipReason, WorkOutcome};

/// External collaborators the service is wired to.
#[derive(Clone)]
pub struct ServiceDependencies {
    pub content: Arc<dyn IContentResolver>,
    pub lister: Arc<dyn IContentLister>,
    pub search: Arc<dyn ISearchResolver>,
    pub schedules: Arc<dyn IScheduleResolver>,
    pub lookups: Arc<dyn ILookupEntryStore>,
    pub summaries: Arc<dyn IEquivalenceSummaryStore>,
    pub results: Arc<dyn IResultStore>,
    pub messages: Arc<dyn IMessageSender>,
    pub progress: Arc<dyn IProgressStore>,
}

/// What `process_subject` did.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub subject_uri: Option<String>,
    pub changed: bool,
    pub audit: Option<StoredEquivalenceResult>,
    /// No source proposed anything.
    pub abstained: bool,
    pub skipped: Option<SkipReason>,
}

impl ProcessReport {
    fn from_work(outcome: WorkOutcome) -> Self {
        match outcome {
            WorkOutcome::Skipped(reason) => Self {
                subject_uri: None,
                changed: false,
                audit: None,
                abstained: false,
                skipped: Some(reason),
            },
            WorkOutcome::Updated(update) => {
                let abstained = matches!(update, UpdateOutcome::Abstained(_));
                match update.into_report() {
                    Some(report) => Self {
                        subject_uri: Some(report.subject_uri),
                        changed: report.changed,
                        audit: Some(report.audit),
                        abstained,
                        skipped: None,
                    },
                    None => Self {
                        subject_uri: None,
                        changed: false,
                        audit: None,
                        abstained,
                        skipped: None,
                    },
                }
            }
        }
    }
}

pub struct EquivalenceService {
    writer: Arc<TransitiveLookupWriter>,
    breaker: EquivalenceBreaker,
    backfill: LookupRefBackfill,
    updaters: Arc<EquivalenceUpdaters>,
    worker: EquivalenceUpdatingWorker,
    task: ContentEquivalenceUpdateTask,
    schedule_task: ScheduleEquivalenceUpdateTask,
    recent_results: Arc<RecentResultStore>,
}

impl EquivalenceService {
    pub fn new(config: &EquivConfig, deps: ServiceDependencies) -> EquivResult<Self> {
        config.validate()?;
        observability::init_tracing(&config.observability);

        let writer = Arc::new(TransitiveLookupWriter::new(deps.lookups.clone(), &config.graph));
        let recent_results = Arc::new(
            RecentResultStore::new(config.worker.recent_results_capacity).backed_by(deps.results.clone()),
        );

        let updater_deps = UpdaterDependencies {
            content: deps.content.clone(),
            search: deps.search.clone(),
            schedules: deps.schedules.clone(),
            lookups: deps.lookups.clone(),
            summaries: deps.summaries.clone(),
            writer: writer.clone() as Arc<dyn ILookupWriter>,
            results: recent_results.clone() as Arc<dyn IResultStore>,
            messages: deps.messages.clone(),
        };
        let updaters = Arc::new(EquivalenceUpdaters::from_profiles(
            &config.publishers,
            &config.update,
            &updater_deps,
        )?);

        let worker = EquivalenceUpdatingWorker::new(
            deps.content.clone(),
            deps.lookups.clone(),
            updaters.clone(),
            RecentlyProcessed::from_config(&config.worker),
            Arc::new(SlotLocks::new()),
        );
        let task = ContentEquivalenceUpdateTask::new(
            deps.lister.clone(),
            deps.content.clone(),
            updaters.clone(),
            deps.progress.clone(),
            config.scan.clone(),
        );
        let schedule_task = ScheduleEquivalenceUpdateTask::new(
            deps.schedules.clone(),
            deps.content.clone(),
            updaters.clone(),
            config.schedule.clone(),
        );
        let backfill = LookupRefBackfill::new(deps.lookups.clone(), deps.progress.clone(), config.backfill.clone());

        info!(updaters = updaters.len(), "equivalence service ready");
        Ok(Self {
            breaker: EquivalenceBreaker::new(writer.clone()),
            writer,
            backfill,
            updaters,
            worker,
            task,
            schedule_task,
            recent_results,
        })
    }

    /// Re-equivalate one subject now.
    pub fn process_subject(&self, subject_id: u64) -> EquivResult<ProcessReport> {
        self.worker.process_subject(subject_id).map(ProcessReport::from_work)
    }

    /// Inbound notification path: deduplicated and slot-locked.
    pub fn handle_notification(&self, notification: &EquivalenceNotification) -> EquivResult<WorkOutcome> {
        self.worker.process(notification)
    }

    /// Remove the direct edge between two entries, both ways.
    pub fn break_equivalence(&self, subject_uri: &str, target_uri: &str) -> EquivResult<LookupEntry> {
        self.breaker.remove_from_set(subject_uri, target_uri)
    }

    /// Remove several direct edges from one subject. `None` when nothing changed.
    pub fn break_equivalences(&self, subject_uri: &str, targets: &[String]) -> EquivResult<Option<LookupEntry>> {
        self.breaker.remove_direct(subject_uri, targets)
    }

    /// Fill missing ids across the graph. Returns the cursor to resume from,
    /// zero once the walk completed.
    pub fn backfill_ids(&self, resume_from: Option<u64>) -> EquivResult<u64> {
        let span = crate::backfill_span!(resume_from);
        let _enter = span.enter();
        Ok(self.backfill.run(resume_from)?.cursor)
    }

    pub fn rescan(&self, publishers: &[Publisher]) -> EquivResult<ScanReport> {
        self.task.run(publishers)
    }

    /// Re-run everything the configured channels broadcast around today.
    pub fn rescan_schedules(&self, publishers: &[Publisher]) -> EquivResult<ScheduleReport> {
        self.schedule_task.run(publishers)
    }

    /// Recompute deferred closures that are due.
    pub fn refresh_stale_closures(&self) -> EquivResult<usize> {
        self.writer.refresh_stale(Utc::now())
    }

    /// Latest audit record for a subject, if still cached.
    pub fn recent_result(&self, uri: &str) -> Option<StoredEquivalenceResult> {
        self.recent_results.latest(uri)
    }

    pub fn updaters(&self) -> &EquivalenceUpdaters {
        &self.updaters
    }

    /// Stop any running re-scan, schedule run or backfill after its current
    /// subject.
    pub fn stop(&self) {
        self.task.stop();
        self.schedule_task.stop();
        self.backfill.stop();
    }
}
