//! Full re-scan of one or more publishers' catalogues.
//!
//! Containers are run before their items so the episode filter has a
//! container summary to check against. Items that sit in a container are
//! covered by the container's pass and skipped at the top level. The cursor
//! is persisted every `save_every` subjects, on stop, and reset to zero when
//! the catalogue is exhausted.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use equiv_core::config::ScanConfig;
use equiv_core::errors::UpdateError;
use equiv_core::traits::{IContentLister, IContentResolver, IProgressStore};
use equiv_core::{Content, ContentShape, EquivResult, Publisher};
use tracing::{info, warn};

use crate::configuration::EquivalenceUpdaters;
use crate::scan_span;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Id of the last subject visited.
    pub cursor: u64,
    /// False when stopped before the end of the catalogue.
    pub finished: bool,
}

pub struct ContentEquivalenceUpdateTask {
    lister: Arc<dyn IContentLister>,
    content: Arc<dyn IContentResolver>,
    updaters: Arc<EquivalenceUpdaters>,
    progress: Arc<dyn IProgressStore>,
    config: ScanConfig,
    ignored: BTreeSet<String>,
    stop: Arc<AtomicBool>,
    is_running: AtomicBool,
}

impl ContentEquivalenceUpdateTask {
    pub fn new(
        lister: Arc<dyn IContentLister>,
        content: Arc<dyn IContentResolver>,
        updaters: Arc<EquivalenceUpdaters>,
        progress: Arc<dyn IProgressStore>,
        config: ScanConfig,
    ) -> Self {
        let ignored = config.ignored_uris.iter().cloned().collect();
        Self {
            lister,
            content,
            updaters,
            progress,
            config,
            ignored,
            stop: Arc::new(AtomicBool::new(false)),
            is_running: AtomicBool::new(false),
        }
    }

    /// Progress key for a set of publishers.
    pub fn task_key(publishers: &[Publisher]) -> String {
        let keys: Vec<&str> = publishers.iter().map(Publisher::key).collect();
        format!("{}-equivalence", keys.join("-"))
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Ask a running scan to stop after the current subject.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn run(&self, publishers: &[Publisher]) -> EquivResult<ScanReport> {
        let key = Self::task_key(publishers);
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UpdateError::AlreadyRunning { key }.into());
        }
        self.stop.store(false, Ordering::SeqCst);

        let result = self.scan(publishers, &key);

        self.is_running.store(false, Ordering::SeqCst);
        result
    }

    fn scan(&self, publishers: &[Publisher], key: &str) -> EquivResult<ScanReport> {
        let span = scan_span!(key);
        let _enter = span.enter();

        let mut report = ScanReport {
            cursor: self.progress.load(key)?,
            ..ScanReport::default()
        };
        info!(task = key, cursor = report.cursor, "scan starting");
        let mut since_save = 0usize;

        loop {
            let batch = self
                .lister
                .list(publishers, report.cursor, self.config.batch_size.max(1))?;
            if batch.is_empty() {
                break;
            }
            let batch_start = report.cursor;
            for subject in batch {
                if self.stop.load(Ordering::SeqCst) {
                    return self.stopped(key, report);
                }
                let Some(id) = subject.id else {
                    warn!(task = key, subject = %subject.canonical_uri, "subject has no id, skipping");
                    report.skipped += 1;
                    continue;
                };

                if subject.shape == ContentShape::Item && subject.container.is_some() {
                    report.skipped += 1;
                } else if self.ignored.contains(&subject.canonical_uri) {
                    report.skipped += 1;
                } else if !self.run_root(subject, &mut report) {
                    return self.stopped(key, report);
                }

                report.cursor = id;
                since_save += 1;
                if since_save >= self.config.save_every.max(1) {
                    self.progress.save(key, report.cursor)?;
                    since_save = 0;
                }
            }
            if report.cursor == batch_start {
                warn!(task = key, cursor = report.cursor, "lister made no progress, ending scan");
                break;
            }
        }

        self.progress.save(key, 0)?;
        report.finished = true;
        info!(
            task = key,
            processed = report.processed,
            failed = report.failed,
            skipped = report.skipped,
            "scan finished"
        );
        Ok(report)
    }

    fn stopped(&self, key: &str, report: ScanReport) -> EquivResult<ScanReport> {
        self.progress.save(key, report.cursor)?;
        info!(task = key, cursor = report.cursor, processed = report.processed, "scan stopped");
        Ok(report)
    }

    /// A top-level subject, then its items when it is a container. False
    /// when a stop arrived before every child ran; the cursor then stays
    /// before the container so a resumed scan picks it up again.
    fn run_root(&self, subject: Arc<Content>, report: &mut ScanReport) -> bool {
        let children = subject.shape.is_container().then(|| subject.children.clone());
        self.run_one(subject, report);

        let Some(children) = children.filter(|c| !c.is_empty()) else {
            return true;
        };
        match self.content.resolve_uris(&children) {
            Ok(items) => {
                for item in items {
                    if self.stop.load(Ordering::SeqCst) {
                        return false;
                    }
                    if self.ignored.contains(&item.canonical_uri) {
                        report.skipped += 1;
                    } else {
                        self.run_one(item, report);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "children unavailable");
                report.failed += children.len();
            }
        }
        true
    }

    fn run_one(&self, subject: Arc<Content>, report: &mut ScanReport) {
        if !self.updaters.handles(&subject) {
            report.skipped += 1;
            return;
        }
        let uri = subject.canonical_uri.clone();
        match self.updaters.update(subject) {
            Ok(_) => report.processed += 1,
            Err(e) => {
                warn!(subject = %uri, error = %e, "re-scan update failed, continuing");
                report.failed += 1;
            }
        }
    }
}
