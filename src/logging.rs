//! Log output for the binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `formbot=debug`).
pub const LOG_ENV: &str = "FORMBOT_LOG";

/// Installs a stderr `tracing` subscriber. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
