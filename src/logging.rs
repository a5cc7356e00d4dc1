//! Structured logging initialization for hosts and tests.
//!
//! The crate itself only emits `tracing` events; this helper wires up a
//! subscriber for binaries that have none. Filtering follows `RUST_LOG`
//! (e.g. `RUST_LOG=openapi_vmod=debug`), defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber with env-filter support.
///
/// Safe to call more than once; later calls are no-ops when a subscriber is
/// already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
