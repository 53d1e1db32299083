//! Transport-agnostic delivery pipeline (mechanics only).
//!
//! This crate defines the seams between the courier roles and their external
//! collaborators, and the orchestration that runs on top of them:
//!
//! - `log`: the append-only [`ActivityLog`] boundary
//! - `queue`: the [`QueuePublisher`]/[`QueueConsumer`] boundary
//! - `delivery`: one in-flight message and its ack/reject lifecycle
//! - `producer`: persist-then-publish on the sender side
//! - `consumer`: the per-delivery processing state machine on the receiver side
//! - `memory`: in-memory implementations for tests/dev
//!
//! ## Delivery guarantees
//!
//! The pipeline is **at-least-once**: a publish is fire-and-forget after the
//! activity-log write, and a rejected delivery is the broker's to redeliver.
//! Nothing here attempts exactly-once; duplicate processing is an accepted
//! property of the design, not a bug.

pub mod consumer;
pub mod delivery;
pub mod log;
pub mod memory;
pub mod producer;
pub mod queue;

pub use consumer::{ProcessError, Worker};
pub use delivery::{AckError, Delivery};
pub use log::{ActivityLog, ActivityLogError};
pub use producer::{Producer, SubmitError};
pub use queue::{PublishError, QueueConsumer, QueuePublisher};
