//! Export error types.

use thiserror::Error;

/// Errors raised while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    /// The finished buffer could not be recovered from the writer.
    #[error("export buffer error: {0}")]
    Buffer(String),
}
