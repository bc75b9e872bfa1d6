//! Span definitions per operation.

/// Create an update span for one subject run.
#[macro_export]
macro_rules! update_span {
    ($subject:expr, $updater:expr) => {
        tracing::info_span!("equiv.update", subject = %$subject, updater = %$updater)
    };
}

/// Create a worker span for one notification.
#[macro_export]
macro_rules! worker_span {
    ($message_id:expr, $subject_id:expr) => {
        tracing::info_span!("equiv.worker", message_id = %$message_id, subject_id = $subject_id)
    };
}

/// Create a backfill span.
#[macro_export]
macro_rules! backfill_span {
    ($cursor:expr) => {
        tracing::info_span!("equiv.backfill", cursor = ?$cursor)
    };
}

/// Create a re-scan span.
#[macro_export]
macro_rules! scan_span {
    ($task:expr) => {
        tracing::info_span!("equiv.scan", task = %$task)
    };
}

/// Create a schedule re-run span.
#[macro_export]
macro_rules! schedule_span {
    ($task:expr) => {
        tracing::info_span!("equiv.schedule", task = %$task)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const UPDATE: &str = "equiv.update";
    pub const WORKER: &str = "equiv.worker";
    pub const BACKFILL: &str = "equiv.backfill";
    pub const SCAN: &str = "equiv.scan";
    pub const SCHEDULE: &str = "equiv.schedule";
}
