//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `OPENLOC_LOG=openloc=debug`.
pub const LOG_ENV: &str = "OPENLOC_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr; calling this twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
