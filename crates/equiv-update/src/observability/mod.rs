//! Tracing setup: subscriber initialisation and span definitions.

pub mod spans;

use std::sync::Once;

use equiv_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "EQUIV_LOG";

/// Initialize the global subscriber.
///
/// `EQUIV_LOG` takes precedence over `config.log_level`. Only the first call
/// has any effect, and a subscriber installed elsewhere is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true);
        let _ = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}
