//! Append-only activity log boundary.
//!
//! The log is treated as reliable synchronous durable storage; its own
//! retry/availability policy lives with the backing store, not here. The
//! contract is deliberately tiny: append a record, read the most recent N.
//! There are no update or delete operations anywhere in the system.

use async_trait::async_trait;
use thiserror::Error;

use courier_core::{ActivityRecord, NewActivityRecord, RecordId};

#[derive(Debug, Error)]
pub enum ActivityLogError {
    /// The backing store could not be reached.
    #[error("activity log unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the statement.
    #[error("activity log query failed: {0}")]
    Query(String),
}

/// Persisted, append-only record of sent/processed units of work.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append one record, returning its monotonic identity.
    async fn append(&self, record: NewActivityRecord) -> Result<RecordId, ActivityLogError>;

    /// The most recent records, newest first, at most `limit` of them.
    async fn recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, ActivityLogError>;
}
