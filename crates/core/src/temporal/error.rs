//! Temporal error types.

use thiserror::Error;

/// Errors that can occur while normalizing an operation instant.
#[derive(Debug, Error)]
pub enum TemporalError {
    /// The supplied calendar date could not be parsed.
    #[error("Unparsable date: {0}")]
    InvalidDate(String),

    /// The supplied timezone identifier is not a known zone.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}
