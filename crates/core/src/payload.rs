//! Validated message payloads.
//!
//! A [`Payload`] is an opaque text payload originated by a client. The only
//! invariant is that it is non-empty after trimming whitespace; empty
//! submissions are rejected here, before anything enters the pipeline.

use crate::error::PayloadError;

/// A non-empty, trimmed text payload.
///
/// Construction goes through [`Payload::parse`], so holding a `Payload`
/// proves the emptiness check already happened. There is no intrinsic
/// application-level identifier beyond the content itself; the queue's
/// delivery handle is the only per-message identity downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    /// Trim and validate a raw submission.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a payload from raw queue bytes (lossy UTF-8).
    ///
    /// The producer only ever publishes validated payloads, but the queue is
    /// an external collaborator; a foreign empty message is rejected rather
    /// than assumed away.
    pub fn from_utf8_lossy(bytes: &[u8]) -> Result<Self, PayloadError> {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
