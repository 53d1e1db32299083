//! Receiver-side processing state machine.
//!
//! One [`Worker`] owns the subscription for the process lifetime. Every
//! delivery gets its own spawned task, so a delivery sleeping through its
//! simulated latency never blocks intake of the next one; completion order
//! is whatever order the timers fire in, not FIFO.
//!
//! Per delivery the steps are strictly sequential:
//!
//! 1. draw a simulated processing duration,
//! 2. draw the failure outcome,
//! 3. sleep for the drawn duration,
//! 4. on success: append an activity record, bump the processed counter, ack;
//! 5. on failure (injected, malformed payload, or persistence error): reject.
//!
//! Errors are fully absorbed by the reject path — they never crash the
//! process or stop the subscription. There is also no cancellation: once a
//! delivery is in flight it runs to a terminal state, however long the drawn
//! duration is.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, warn};

use courier_core::{
    DelaySampler, FailureOracle, InstanceIdentity, NewActivityRecord, Payload, PayloadError,
    ServiceStats,
};

use crate::delivery::Delivery;
use crate::log::{ActivityLog, ActivityLogError};
use crate::queue::QueueConsumer;

/// Why one processing attempt ended in a reject.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Deliberately injected failure; downstream it is indistinguishable
    /// from a genuine one.
    #[error("injected processing failure")]
    SimulatedFailure,

    #[error("failed to persist processed message: {0}")]
    Persistence(#[from] ActivityLogError),

    #[error("malformed payload: {0}")]
    Malformed(#[from] PayloadError),
}

/// Consumes deliveries and runs each through simulated processing.
pub struct Worker {
    log: Arc<dyn ActivityLog>,
    delay: Arc<dyn DelaySampler>,
    oracle: Arc<dyn FailureOracle>,
    identity: InstanceIdentity,
    stats: Arc<ServiceStats>,
}

impl Worker {
    pub fn new(
        log: Arc<dyn ActivityLog>,
        delay: Arc<dyn DelaySampler>,
        oracle: Arc<dyn FailureOracle>,
        identity: InstanceIdentity,
        stats: Arc<ServiceStats>,
    ) -> Self {
        Self {
            log,
            delay,
            oracle,
            identity,
            stats,
        }
    }

    /// Pull deliveries until the subscription ends, spawning one task per
    /// delivery.
    pub async fn run<C: QueueConsumer>(self: Arc<Self>, mut consumer: C) {
        while let Some(delivery) = consumer.next_delivery().await {
            let worker = Arc::clone(&self);
            tokio::spawn(async move {
                worker.handle(delivery).await;
            });
        }
        warn!("queue subscription ended");
    }

    /// Run one delivery to a terminal state (acked or rejected).
    pub async fn handle(&self, delivery: Box<dyn Delivery>) {
        match self.process(delivery.payload()).await {
            Ok(elapsed) => {
                debug!(elapsed_ms = elapsed.as_millis() as u64, "message processing complete");
                if let Err(err) = delivery.ack().await {
                    error!(%err, "failed to ack delivery");
                }
            }
            Err(err) => {
                warn!(%err, "processing failed, rejecting delivery");
                if let Err(err) = delivery.reject().await {
                    error!(%err, "failed to reject delivery");
                }
            }
        }
    }

    async fn process(&self, raw: &[u8]) -> Result<Duration, ProcessError> {
        let payload = Payload::from_utf8_lossy(raw)?;
        let simulated = self.delay.sample();
        let doomed = self.oracle.should_fail();
        debug!(
            message = %payload,
            simulated_ms = simulated.as_millis() as u64,
            "received queue task"
        );

        let started = tokio::time::Instant::now();
        tokio::time::sleep(simulated).await;

        if doomed {
            return Err(ProcessError::SimulatedFailure);
        }

        let elapsed = started.elapsed();
        let record =
            NewActivityRecord::processed(&self.identity, &payload, elapsed.as_millis() as i64);
        let timestamp_ms = record.timestamp_ms;
        self.log.append(record).await?;
        self.stats.record(timestamp_ms);

        Ok(elapsed)
    }
}
