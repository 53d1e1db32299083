//! Activity records: the append-only unit of the activity log.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::identity::InstanceIdentity;
use crate::payload::Payload;

/// Database-assigned, monotonically increasing record identity.
pub type RecordId = i64;

/// A not-yet-persisted activity record.
///
/// Created by the producer when a message is sent, or by the consumer when a
/// message is successfully processed. Records are append-only: nothing in
/// this system ever updates or deletes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityRecord {
    /// Epoch milliseconds at the moment the record was created.
    pub timestamp_ms: i64,
    /// Simulated processing duration in milliseconds; present only on the
    /// receiver side.
    pub processing_ms: Option<i64>,
    /// Attribution label of the instance that wrote the record.
    pub processed_by: String,
    /// Display color of that instance.
    pub processed_by_color: String,
    /// Copy of the message payload.
    pub message: String,
}

impl NewActivityRecord {
    /// Record for a message the sender just accepted and is about to publish.
    pub fn sent(identity: &InstanceIdentity, payload: &Payload) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            processing_ms: None,
            processed_by: identity.name().to_string(),
            processed_by_color: identity.color().to_string(),
            message: payload.as_str().to_string(),
        }
    }

    /// Record for a message the receiver finished processing.
    pub fn processed(identity: &InstanceIdentity, payload: &Payload, elapsed_ms: i64) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            processing_ms: Some(elapsed_ms),
            processed_by: identity.name().to_string(),
            processed_by_color: identity.color().to_string(),
            message: payload.as_str().to_string(),
        }
    }
}

/// A persisted activity record, as returned by `recent` queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: RecordId,
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_ms: Option<i64>,
    pub processed_by: String,
    pub processed_by_color: String,
    pub message: String,
}
