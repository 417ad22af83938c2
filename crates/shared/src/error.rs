//! Application-wide error types.
//!
//! Module-level errors (temporal, ledger, query) live next to the logic that
//! raises them; this is the classified surface handed back to callers.

use thiserror::Error;

use crate::types::OperationId;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error classes.
///
/// Every failure path returns exactly one of these; nothing is silently
/// swallowed.
#[derive(Debug, Error)]
pub enum AppError {
    /// A supplied date could not be parsed into an operation instant.
    #[error("Invalid temporal input: {0}")]
    InvalidTemporalInput(String),

    /// A filter referenced an unknown field or an unsupported operator.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A balance mutation could not complete atomically. The account
    /// balance is left unchanged; the triggering request fails hard.
    #[error("Ledger inconsistency: {0}")]
    LedgerInconsistency(String),

    /// A referenced entity is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bulk call applied some transitions and failed others. Succeeded
    /// effects are kept; both id sets are reported.
    #[error("Partial batch failure: {} succeeded, {} failed", succeeded.len(), failed.len())]
    PartialBatchFailure {
        /// Operations whose transition was applied.
        succeeded: Vec<OperationId>,
        /// Operations that could not be processed.
        failed: Vec<OperationId>,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTemporalInput(_) | Self::InvalidFilter(_) => 400,
            Self::NotFound(_) => 404,
            Self::LedgerInconsistency(_) => 409,
            Self::PartialBatchFailure { .. } => 207,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTemporalInput(_) => "INVALID_TEMPORAL_INPUT",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::LedgerInconsistency(_) => "LEDGER_INCONSISTENCY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PartialBatchFailure { .. } => "PARTIAL_BATCH_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
