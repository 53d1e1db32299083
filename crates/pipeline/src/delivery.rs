//! One in-flight queue delivery and its settlement.

use async_trait::async_trait;
use thiserror::Error;

/// Settling a delivery with the broker failed.
///
/// By this point the application has already decided the outcome; a failed
/// ack/reject only means the broker may redeliver (at-least-once).
#[derive(Debug, Error)]
#[error("delivery settlement failed: {0}")]
pub struct AckError(pub String);

/// A (payload, delivery-handle) pair surfaced by the queue subsystem.
///
/// Every delivery must be terminated exactly once by either [`ack`] or
/// [`reject`] — never both, never neither. Both settlement methods consume
/// the delivery, so "never both" holds at the type level; liveness (every
/// delivery eventually reaching one of them) is the consumer's contract.
///
/// Lifecycle, from the application's perspective:
///
/// ```text
/// Delivered → Processing → (Persisted → Acked) | Rejected
/// ```
///
/// `Acked` and `Rejected` are terminal. After a reject the broker owns any
/// redelivery decision; the application never sees that handle again.
///
/// [`ack`]: Delivery::ack
/// [`reject`]: Delivery::reject
#[async_trait]
pub trait Delivery: Send {
    /// Raw payload bytes as delivered by the broker.
    fn payload(&self) -> &[u8];

    /// Mark the delivery successfully handled.
    async fn ack(self: Box<Self>) -> Result<(), AckError>;

    /// Hand the delivery back to the broker without forcing a requeue; the
    /// broker's default redelivery policy applies.
    async fn reject(self: Box<Self>) -> Result<(), AckError>;
}
