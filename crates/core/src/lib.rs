//! Domain types for the courier pipeline.
//!
//! This crate holds everything the sender and receiver roles agree on but
//! that involves no IO: validated payloads, activity records, instance
//! identity, the simulated-processing knobs, advisory counters, and the
//! startup configuration surface.

pub mod config;
pub mod error;
pub mod identity;
pub mod payload;
pub mod record;
pub mod sim;
pub mod stats;

pub use config::Config;
pub use error::{ConfigError, PayloadError};
pub use identity::InstanceIdentity;
pub use payload::Payload;
pub use record::{ActivityRecord, NewActivityRecord, RecordId};
pub use sim::{AlwaysFail, DelaySampler, FailureOracle, NeverFail, RandomFailureOracle, UniformDelay};
pub use stats::ServiceStats;
