//! Dependency bootstrap: retry forever, then hand back the handle.
//!
//! The service has no useful degraded mode, so startup is
//! liveness-over-latency: each dependency connection retries indefinitely at
//! a fixed interval and the process never starts serving traffic until every
//! one of them is up. Failure here is never fatal-and-exit, only
//! fatal-and-retry. Binaries run the individual bootstraps concurrently with
//! `tokio::join!`; one side failing never short-circuits the other.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

/// Fixed delay between connection attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Call `connect` until it succeeds, sleeping [`RETRY_DELAY`] between
/// attempts and logging each failure.
///
/// This cannot terminally fail by design; the return type says so.
pub async fn connect_with_retry<T, E, F, Fut>(dependency: &str, mut connect: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    loop {
        debug!(dependency, "trying to connect");
        match connect().await {
            Ok(handle) => {
                info!(dependency, "connection established");
                return handle;
            }
            Err(err) => {
                warn!(dependency, %err, "connection failed, retrying in 1000 ms");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
