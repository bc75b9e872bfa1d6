use serde::{Deserialize, Serialize};

use super::defaults;

/// Notification worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Upper bound on remembered subject ids.
    pub recently_processed_capacity: u64,
    /// Repeat notifications for a subject inside this window are skipped (seconds).
    pub recently_processed_ttl_secs: u64,
    /// Audit records kept in memory for inspection.
    pub recent_results_capacity: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            recently_processed_capacity: defaults::DEFAULT_RECENTLY_PROCESSED_CAPACITY,
            recently_processed_ttl_secs: defaults::DEFAULT_RECENTLY_PROCESSED_TTL_SECS,
            recent_results_capacity: defaults::DEFAULT_RECENT_RESULTS_CAPACITY,
        }
    }
}

/// Full-catalogue re-scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Persist the cursor every N subjects.
    pub save_every: usize,
    pub batch_size: usize,
    /// Uris never re-equivalated by the scan.
    pub ignored_uris: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            save_every: defaults::DEFAULT_SCAN_SAVE_EVERY,
            batch_size: defaults::DEFAULT_SCAN_BATCH_SIZE,
            ignored_uris: Vec::new(),
        }
    }
}

/// Schedule-driven re-run: everything the channels broadcast from
/// `back_days` before today to `forward_days` after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub channels: Vec<String>,
    pub back_days: u32,
    pub forward_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            back_days: defaults::DEFAULT_SCHEDULE_BACK_DAYS,
            forward_days: defaults::DEFAULT_SCHEDULE_FORWARD_DAYS,
        }
    }
}

/// Lookup-ref id backfill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackfillConfig {
    pub save_every: usize,
    pub batch_size: usize,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            save_every: defaults::DEFAULT_BACKFILL_SAVE_EVERY,
            batch_size: defaults::DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }
}
