//! Re-equivalates whatever a set of channels broadcast over a window of days.
//!
//! Days run latest first, so the end of the window, which is least likely to
//! have been equivalated already, goes first. A stop request is honoured
//! between channels and between items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use equiv_core::config::ScheduleConfig;
use equiv_core::errors::UpdateError;
use equiv_core::traits::{IContentResolver, IScheduleResolver};
use equiv_core::{Content, EquivResult, Publisher};
use tracing::{debug, info, warn};

use crate::configuration::EquivalenceUpdaters;
use crate::schedule_span;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Days whose every channel was visited.
    pub days: usize,
    pub finished: bool,
}

pub struct ScheduleEquivalenceUpdateTask {
    schedules: Arc<dyn IScheduleResolver>,
    content: Arc<dyn IContentResolver>,
    updaters: Arc<EquivalenceUpdaters>,
    config: ScheduleConfig,
    stop: Arc<AtomicBool>,
    is_running: AtomicBool,
}

impl ScheduleEquivalenceUpdateTask {
    pub fn new(
        schedules: Arc<dyn IScheduleResolver>,
        content: Arc<dyn IContentResolver>,
        updaters: Arc<EquivalenceUpdaters>,
        config: ScheduleConfig,
    ) -> Self {
        Self {
            schedules,
            content,
            updaters,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            is_running: AtomicBool::new(false),
        }
    }

    pub fn task_key(publishers: &[Publisher]) -> String {
        let keys: Vec<&str> = publishers.iter().map(Publisher::key).collect();
        format!("{}-schedule-equivalence", keys.join("-"))
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Days of the window around `today`, latest first.
    pub fn days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let first = today - Duration::days(i64::from(self.config.back_days));
        let last = today + Duration::days(i64::from(self.config.forward_days));
        let mut days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
        days.reverse();
        days
    }

    pub fn run(&self, publishers: &[Publisher]) -> EquivResult<ScheduleReport> {
        self.run_around(publishers, Utc::now().date_naive())
    }

    /// Run over the window centred on `today`.
    pub fn run_around(&self, publishers: &[Publisher], today: NaiveDate) -> EquivResult<ScheduleReport> {
        let key = Self::task_key(publishers);
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UpdateError::AlreadyRunning { key }.into());
        }
        self.stop.store(false, Ordering::SeqCst);

        let span = schedule_span!(key);
        let report = span.in_scope(|| self.walk(publishers, today, &key));

        self.is_running.store(false, Ordering::SeqCst);
        Ok(report)
    }

    fn walk(&self, publishers: &[Publisher], today: NaiveDate, key: &str) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        info!(task = key, channels = self.config.channels.len(), "schedule run starting");

        for day in self.days(today) {
            let from = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
            let to = from + Duration::days(1);
            for publisher in publishers {
                for channel in &self.config.channels {
                    if self.stop.load(Ordering::SeqCst) {
                        info!(task = key, %day, processed = report.processed, "schedule run stopped");
                        return report;
                    }
                    let items =
                        match self.schedules.schedule(channel, from, to, std::slice::from_ref(publisher)) {
                            Ok(items) => items,
                            Err(e) => {
                                warn!(task = key, channel = %channel, %day, error = %e, "schedule unavailable");
                                report.failed += 1;
                                continue;
                            }
                        };
                    debug!(task = key, channel = %channel, %day, items = items.len(), "schedule fetched");
                    for item in items {
                        if self.stop.load(Ordering::SeqCst) {
                            info!(task = key, %day, processed = report.processed, "schedule run stopped");
                            return report;
                        }
                        self.run_one(item, &mut report);
                    }
                }
            }
            report.days += 1;
        }

        report.finished = true;
        info!(
            task = key,
            days = report.days,
            processed = report.processed,
            failed = report.failed,
            skipped = report.skipped,
            "schedule run finished"
        );
        report
    }

    /// Schedules carry a broadcast view of the item; the updater gets the
    /// stored record.
    fn run_one(&self, scheduled: Arc<Content>, report: &mut ScheduleReport) {
        let uri = scheduled.canonical_uri.clone();
        let subject = match self.content.resolve_uris(std::slice::from_ref(&uri)) {
            Ok(mut found) if !found.is_empty() => found.swap_remove(0),
            Ok(_) => {
                debug!(subject = %uri, "scheduled item not stored, skipping");
                report.skipped += 1;
                return;
            }
            Err(e) => {
                warn!(subject = %uri, error = %e, "scheduled item unavailable");
                report.failed += 1;
                return;
            }
        };
        if !self.updaters.handles(&subject) {
            report.skipped += 1;
            return;
        }
        match self.updaters.update(subject) {
            Ok(_) => report.processed += 1,
            Err(e) => {
                warn!(subject = %uri, error = %e, "schedule update failed, continuing");
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use chrono::DateTime;
    use equiv_core::content::Broadcast;
    use equiv_core::models::{EquivalenceResults, HandleOutcome};
    use equiv_core::traits::IResultHandler;
    use equiv_core::ContentShape;
    use equiv_results::combining::AdditiveCombiner;
    use equiv_results::extraction::AllOverOrEqualThresholdExtractor;
    use equiv_results::filtering::{ConjunctiveFilter, MinimumScoreFilter};
    use equiv_results::EquivalenceResultBuilder;
    use test_fixtures::InMemoryContentStore;

    use super::*;
    use crate::configuration::UpdaterConfiguration;

    /// Records handled subjects; raises the stop flag once `stop_after` ran.
    #[derive(Clone, Default)]
    struct Recording {
        handled: Arc<Mutex<Vec<String>>>,
        stop_after: usize,
        flag: Arc<OnceLock<Arc<AtomicBool>>>,
    }

    impl IResultHandler for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
            let mut handled = self.handled.lock().unwrap();
            handled.push(results.subject.canonical_uri.clone());
            if let Some(flag) = self.flag.get() {
                if handled.len() >= self.stop_after {
                    flag.store(true, Ordering::SeqCst);
                }
            }
            Ok(HandleOutcome::unchanged())
        }
    }

    fn updaters(handler: Recording) -> Arc<EquivalenceUpdaters> {
        let builder = EquivalenceResultBuilder::new(
            Box::new(AdditiveCombiner::new()),
            Box::new(ConjunctiveFilter::new(vec![Box::new(MinimumScoreFilter::new(0.1))])),
            Box::new(AllOverOrEqualThresholdExtractor::new(1.0)),
        );
        let mut updaters = EquivalenceUpdaters::new();
        updaters.register(
            Publisher::new("pa"),
            ContentShape::Item,
            UpdaterConfiguration::new("items", builder, Box::new(handler)),
        );
        Arc::new(updaters)
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn aired(uri: &str, channel: &str, day: u32) -> Content {
        Content::item(uri, "pa").with_broadcast(Broadcast::new(channel, at(day, 20), at(day, 21)))
    }

    fn store() -> Arc<InMemoryContentStore> {
        Arc::new(InMemoryContentStore::with([
            aired("http://pa/mon", "bbcone", 4),
            aired("http://pa/tue", "bbcone", 5),
            aired("http://pa/wed", "bbcone", 6),
            aired("http://pa/other-channel", "itv1", 5),
            aired("http://pa/too-late", "bbcone", 20),
            Content::item("http://bbc/mon", "bbc").with_broadcast(Broadcast::new("bbcone", at(4, 20), at(4, 21))),
        ]))
    }

    fn config() -> ScheduleConfig {
        ScheduleConfig {
            channels: vec!["bbcone".into()],
            back_days: 1,
            forward_days: 1,
        }
    }

    fn tuesday() -> NaiveDate {
        at(5, 0).date_naive()
    }

    #[test]
    fn window_runs_latest_day_first() {
        let store = store();
        let task = ScheduleEquivalenceUpdateTask::new(store.clone(), store, updaters(Recording::default()), config());
        let days = task.days(tuesday());
        assert_eq!(days, vec![at(6, 0).date_naive(), tuesday(), at(4, 0).date_naive()]);
    }

    #[test]
    fn runs_every_scheduled_item_of_the_window() {
        let store = store();
        let handler = Recording::default();
        let task = ScheduleEquivalenceUpdateTask::new(store.clone(), store, updaters(handler.clone()), config());

        let report = task.run_around(&[Publisher::new("pa")], tuesday()).unwrap();
        assert!(report.finished);
        assert_eq!(report.days, 3);
        assert_eq!(report.processed, 3);
        assert_eq!(
            handler.handled.lock().unwrap().as_slice(),
            &["http://pa/wed".to_string(), "http://pa/tue".to_string(), "http://pa/mon".to_string()]
        );
        assert!(!task.is_running());
    }

    #[test]
    fn stop_lands_between_items() {
        let store = store();
        store.insert(aired("http://pa/wed-late", "bbcone", 6));
        let handler = Recording {
            stop_after: 1,
            ..Recording::default()
        };
        let task = ScheduleEquivalenceUpdateTask::new(store.clone(), store, updaters(handler.clone()), config());
        assert!(handler.flag.set(task.stop_handle()).is_ok());

        let report = task.run_around(&[Publisher::new("pa")], tuesday()).unwrap();
        assert!(!report.finished);
        assert_eq!(report.processed, 1);
        assert_eq!(report.days, 0);
        assert_eq!(handler.handled.lock().unwrap().len(), 1);
    }

    #[test]
    fn unavailable_schedule_counts_a_failure_per_channel_and_day() {
        let store = store();
        store.set_unavailable(true);
        let task = ScheduleEquivalenceUpdateTask::new(store.clone(), store, updaters(Recording::default()), config());
        let report = task.run_around(&[Publisher::new("pa")], tuesday()).unwrap();
        assert!(report.finished);
        assert_eq!(report.failed, 3);
        assert_eq!(report.processed, 0);
    }
}
