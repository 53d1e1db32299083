//! Advisory per-instance counters for the status view.
//!
//! These are process-local display metrics (messages handled, last activity
//! time), not cluster-wide truth. In a multi-instance deployment each replica
//! reports its own numbers; nothing synchronizes them across instances.
//! Relaxed atomics are enough: a benign race under concurrent completions
//! only ever skews the display by one in-flight message.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Count + last-activity timestamp, owned by one service instance.
#[derive(Debug, Default)]
pub struct ServiceStats {
    handled: AtomicU64,
    // Epoch millis of the last handled message; 0 means "never".
    last_handled_ms: AtomicI64,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one handled message at the given epoch-millis timestamp.
    pub fn record(&self, timestamp_ms: i64) {
        self.handled.fetch_add(1, Ordering::Relaxed);
        self.last_handled_ms.store(timestamp_ms, Ordering::Relaxed);
    }

    pub fn handled_count(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn last_handled_at(&self) -> Option<DateTime<Utc>> {
        match self.last_handled_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }
}
