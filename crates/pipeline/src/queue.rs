//! Durable queue boundary.
//!
//! Broker semantics (exchanges, routing, clustering, redelivery) belong to
//! the external queue service. These traits only capture how a producer and
//! a consumer *use* such a service: publish opaque bytes durably, and pull
//! manually-acknowledged deliveries.

use async_trait::async_trait;
use thiserror::Error;

use crate::delivery::Delivery;

/// Publishing to the queue failed.
///
/// On the producer side this surfaces *after* the activity-log write already
/// succeeded; the gap is accepted rather than masked (no two-phase commit).
#[derive(Debug, Error)]
#[error("queue publish failed: {0}")]
pub struct PublishError(pub String);

/// Producer-side handle to the named durable queue.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Publish raw payload bytes with broker-side persistence requested.
    /// Fire-and-forget: no publish-confirm wait.
    async fn publish(&self, payload: &[u8]) -> Result<(), PublishError>;
}

/// Consumer-side subscription to the named durable queue.
///
/// One subscription exists per process lifetime, in manual-ack mode with
/// unbounded prefetch. `None` means the subscription ended (broker closed
/// the channel); transient per-delivery errors are absorbed internally.
#[async_trait]
pub trait QueueConsumer: Send {
    async fn next_delivery(&mut self) -> Option<Box<dyn Delivery>>;
}
