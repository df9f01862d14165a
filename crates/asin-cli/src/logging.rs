//! Logging init: stderr, filtered by `RUST_LOG`.
//!
//! Library crates log through the `log` facade; the subscriber's log bridge
//! picks those records up.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `verbose` raises the default level to debug.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
