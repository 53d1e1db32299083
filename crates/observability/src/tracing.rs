//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Fallback filter when `RUST_LOG` is unset: the courier crates at debug,
/// everything else (lapin frame logs, sqlx statement logs) at info.
const DEFAULT_DIRECTIVES: &str =
    "info,courier_pipeline=debug,courier_infra=debug,courier_sender=debug,courier_receiver=debug";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
