//! Store error surface.

use thiserror::Error;

use tally_core::export::ExportError;
use tally_core::ledger::LedgerError;
use tally_core::query::QueryError;
use tally_core::temporal::TemporalError;
use tally_shared::AppError;
use tally_shared::types::OperationId;

/// Errors raised by repositories and the operation service.
///
/// Module-level errors pass through unchanged; [`From<StoreError>`] maps
/// them onto the application error classes at the outer boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Date/time normalization failed.
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Ledger arithmetic or application failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A filter set did not compile.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// CSV rendering failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A bulk approval applied some transitions and failed others.
    #[error("partial batch failure: {} succeeded, {} failed", succeeded.len(), failed.len())]
    PartialBatch {
        /// Operations whose transition was applied and kept.
        succeeded: Vec<OperationId>,
        /// Operations that could not be processed.
        failed: Vec<OperationId>,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Temporal(e) => Self::InvalidTemporalInput(e.to_string()),
            StoreError::Query(e) => Self::InvalidFilter(e.to_string()),
            StoreError::Ledger(LedgerError::AccountNotFound(id)) => {
                Self::NotFound(format!("account {id}"))
            }
            StoreError::Ledger(e) => Self::LedgerInconsistency(e.to_string()),
            StoreError::Export(e) => Self::Internal(e.to_string()),
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::PartialBatch { succeeded, failed } => {
                Self::PartialBatchFailure { succeeded, failed }
            }
        }
    }
}
