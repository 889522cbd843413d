//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `mirage=debug`.
pub const LOG_ENV: &str = "MIRAGE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber. Later calls are no-ops.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
