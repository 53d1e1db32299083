//! Sender-side persist-then-publish orchestration.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use courier_core::{InstanceIdentity, NewActivityRecord, Payload, RecordId, ServiceStats};

use crate::log::{ActivityLog, ActivityLogError};
use crate::queue::{PublishError, QueuePublisher};

/// A submit failed.
///
/// The two variants are not transactional with each other: `Persistence`
/// means nothing was published; `Publish` means the activity record was
/// already written when the publish failed. No compensating delete is
/// attempted — the record stays, the message is lost, and the caller decides
/// whether to resubmit (which would write a fresh record; there is no
/// idempotency key in the payload).
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to persist outgoing message: {0}")]
    Persistence(#[from] ActivityLogError),

    #[error("failed to publish message to queue: {0}")]
    Publish(#[from] PublishError),
}

/// Accepts validated units of work and pushes them into the pipeline.
///
/// Side effects of [`submit`], in order:
/// 1. append an activity record stamped with this instance's identity,
/// 2. bump the process-local sent counter,
/// 3. publish the raw payload to the durable queue (persistent flag set).
///
/// A persistence failure aborts before the publish ever happens.
///
/// [`submit`]: Producer::submit
pub struct Producer {
    log: Arc<dyn ActivityLog>,
    queue: Arc<dyn QueuePublisher>,
    identity: InstanceIdentity,
    stats: Arc<ServiceStats>,
}

impl Producer {
    pub fn new(
        log: Arc<dyn ActivityLog>,
        queue: Arc<dyn QueuePublisher>,
        identity: InstanceIdentity,
        stats: Arc<ServiceStats>,
    ) -> Self {
        Self {
            log,
            queue,
            identity,
            stats,
        }
    }

    #[instrument(skip(self, payload), err)]
    pub async fn submit(&self, payload: &Payload) -> Result<RecordId, SubmitError> {
        let record = NewActivityRecord::sent(&self.identity, payload);
        let timestamp_ms = record.timestamp_ms;

        let id = self.log.append(record).await?;
        self.stats.record(timestamp_ms);

        self.queue.publish(payload.as_bytes()).await?;
        debug!(record_id = id, "message persisted and published");

        Ok(id)
    }
}
