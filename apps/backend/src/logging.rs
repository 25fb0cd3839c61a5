//! Structured logging initialization for embedding servers.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG`, defaulting to `info`. Safe to call
/// more than once; later calls are no-ops.
pub fn init() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).try_init().ok();
}
