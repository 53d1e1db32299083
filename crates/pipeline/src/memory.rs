//! In-memory activity log and queue for tests/dev.
//!
//! - No IO, no broker
//! - The queue records every settlement so tests can assert the
//!   exactly-one-of-ack/reject property
//! - The log and the queue each carry a failure toggle to exercise the
//!   error paths

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use courier_core::{ActivityRecord, NewActivityRecord, RecordId};

use crate::delivery::{AckError, Delivery};
use crate::log::{ActivityLog, ActivityLogError};
use crate::queue::{PublishError, QueueConsumer, QueuePublisher};

/// In-memory append-only activity log.
#[derive(Debug)]
pub struct InMemoryActivityLog {
    rows: Mutex<Vec<ActivityRecord>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `append` fail, to drive the persistence-error
    /// paths in tests.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `recent` fail, to drive the read-error paths in
    /// the status views.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn append(&self, record: NewActivityRecord) -> Result<RecordId, ActivityLogError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ActivityLogError::Unavailable(
                "in-memory log set to fail writes".to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().expect("activity log lock poisoned");
        rows.push(ActivityRecord {
            id,
            timestamp_ms: record.timestamp_ms,
            processing_ms: record.processing_ms,
            processed_by: record.processed_by,
            processed_by_color: record.processed_by_color,
            message: record.message,
        });
        Ok(id)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, ActivityLogError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ActivityLogError::Unavailable(
                "in-memory log set to fail reads".to_string(),
            ));
        }

        let rows = self.rows.lock().expect("activity log lock poisoned");
        let mut out = rows.clone();
        // Newest first; ties broken by insertion id so the order is stable.
        out.sort_by(|a, b| {
            b.timestamp_ms
                .cmp(&a.timestamp_ms)
                .then_with(|| b.id.cmp(&a.id))
        });
        out.truncate(limit as usize);
        Ok(out)
    }
}

/// Terminal outcome of one in-memory delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Acked(Vec<u8>),
    Rejected(Vec<u8>),
}

#[derive(Debug, Default)]
struct QueueState {
    settlements: Mutex<Vec<Settlement>>,
    fail_publishes: AtomicBool,
}

/// Publisher half of the in-memory queue.
#[derive(Debug)]
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    state: std::sync::Arc<QueueState>,
}

/// Consumer half of the in-memory queue.
#[derive(Debug)]
pub struct InMemoryConsumer {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    state: std::sync::Arc<QueueState>,
}

impl InMemoryQueue {
    /// Create a connected publisher/consumer pair.
    pub fn channel() -> (InMemoryQueue, InMemoryConsumer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = std::sync::Arc::new(QueueState::default());
        (
            InMemoryQueue {
                tx,
                state: state.clone(),
            },
            InMemoryConsumer { rx, state },
        )
    }

    /// Make every subsequent `publish` fail.
    pub fn fail_publishes(&self, fail: bool) {
        self.state.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Settlements recorded so far, in the order they happened.
    pub fn settlements(&self) -> Vec<Settlement> {
        self.state
            .settlements
            .lock()
            .expect("settlement lock poisoned")
            .clone()
    }
}

#[async_trait]
impl QueuePublisher for InMemoryQueue {
    async fn publish(&self, payload: &[u8]) -> Result<(), PublishError> {
        if self.state.fail_publishes.load(Ordering::SeqCst) {
            return Err(PublishError(
                "in-memory queue set to fail publishes".to_string(),
            ));
        }
        self.tx
            .send(payload.to_vec())
            .map_err(|_| PublishError("consumer side closed".to_string()))
    }
}

#[async_trait]
impl QueueConsumer for InMemoryConsumer {
    async fn next_delivery(&mut self) -> Option<Box<dyn Delivery>> {
        let payload = self.rx.recv().await?;
        Some(Box::new(InMemoryDelivery {
            payload,
            state: self.state.clone(),
        }))
    }
}

struct InMemoryDelivery {
    payload: Vec<u8>,
    state: std::sync::Arc<QueueState>,
}

impl InMemoryDelivery {
    fn settle(self, settlement: Settlement) {
        self.state
            .settlements
            .lock()
            .expect("settlement lock poisoned")
            .push(settlement);
    }
}

#[async_trait]
impl Delivery for InMemoryDelivery {
    fn payload(&self) -> &[u8] {
        &self.payload
    }

    async fn ack(self: Box<Self>) -> Result<(), AckError> {
        let payload = self.payload.clone();
        self.settle(Settlement::Acked(payload));
        Ok(())
    }

    async fn reject(self: Box<Self>) -> Result<(), AckError> {
        let payload = self.payload.clone();
        self.settle(Settlement::Rejected(payload));
        Ok(())
    }
}

/// Delay sampler that replays a fixed sequence of durations.
///
/// Lives here rather than in the core because it is a test double: samplers
/// are drawn in delivery-receipt order, which lets timing tests pin each
/// delivery's simulated duration.
#[derive(Debug)]
pub struct FixedDelays {
    queue: Mutex<VecDeque<std::time::Duration>>,
}

impl FixedDelays {
    pub fn new(delays_ms: impl IntoIterator<Item = u64>) -> Self {
        Self {
            queue: Mutex::new(
                delays_ms
                    .into_iter()
                    .map(std::time::Duration::from_millis)
                    .collect(),
            ),
        }
    }
}

impl courier_core::DelaySampler for FixedDelays {
    fn sample(&self) -> std::time::Duration {
        self.queue
            .lock()
            .expect("delay queue lock poisoned")
            .pop_front()
            .unwrap_or(std::time::Duration::ZERO)
    }
}
