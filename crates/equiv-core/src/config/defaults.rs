//! Default values for every configuration field.

// Update pipeline
pub const DEFAULT_MINIMUM_SCORE: f64 = 0.25;
pub const DEFAULT_N_TIMES_GREATER: f64 = 1.5;
pub const DEFAULT_BROADCAST_FLEXIBILITY_MINS: i64 = 5;
pub const DEFAULT_TITLE_SEARCH_LIMIT: usize = 20;
pub const DEFAULT_TITLE_SIMILARITY_FLOOR: f64 = 0.8;
pub const DEFAULT_ITEM_TITLE_MATCH_SCORE: f64 = 2.0;
pub const DEFAULT_CONTAINER_TITLE_MATCH_SCORE: f64 = 2.0;
pub const DEFAULT_SEQUENCE_MATCH_SCORE: f64 = 1.0;
pub const DEFAULT_ALIAS_MATCH_SCORE: f64 = 2.0;
pub const DEFAULT_CONTAINER_CHILD_SCALE: f64 = 20.0;
pub const DEFAULT_FILM_YEAR_TOLERANCE: u16 = 1;
pub const DEFAULT_MULTIPLE_CANDIDATE_BAND: f64 = 0.3;
pub const DEFAULT_BROADCAST_TITLE_SUBSET_PERCENT: u8 = 80;
pub const DEFAULT_DESCRIPTION_OVERLAP: f64 = 0.4;
pub const DEFAULT_DESCRIPTION_TITLE_DIVISOR: f64 = 2.0;

// Graph
pub const DEFAULT_MAX_TRANSITIVE_SET_SIZE: usize = 150;
pub const DEFAULT_RECOMPUTE_AFTER_WRITES: u32 = 20;
pub const DEFAULT_RECOMPUTE_AFTER_SECS: u64 = 3_600;

// Worker
pub const DEFAULT_RECENTLY_PROCESSED_CAPACITY: u64 = 10_000;
pub const DEFAULT_RECENTLY_PROCESSED_TTL_SECS: u64 = 30;
pub const DEFAULT_RECENT_RESULTS_CAPACITY: u64 = 1_000;

// Re-scan
pub const DEFAULT_SCAN_SAVE_EVERY: usize = 10;
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 100;

// Schedule re-run
pub const DEFAULT_SCHEDULE_BACK_DAYS: u32 = 1;
pub const DEFAULT_SCHEDULE_FORWARD_DAYS: u32 = 7;

// Backfill
pub const DEFAULT_BACKFILL_SAVE_EVERY: usize = 100;
pub const DEFAULT_BACKFILL_BATCH_SIZE: usize = 1_000;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
