//! Domain error model.
//!
//! Keep this focused on deterministic failures (validation, configuration).
//! Infrastructure concerns (queue, store) carry their own error types next
//! to the traits that produce them.

use thiserror::Error;

/// Payload validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The submitted payload was empty after trimming whitespace.
    #[error("payload is empty after trimming whitespace")]
    Empty,
}

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} is not a valid number: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
}
