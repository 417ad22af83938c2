//! Ledger error types.

use thiserror::Error;

use tally_shared::types::AccountId;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Operation amounts must be non-zero.
    #[error("Operation amount must be non-zero")]
    ZeroAmount,

    /// A balance mutation could not complete atomically. Prior state has
    /// been restored; the triggering request fails hard.
    #[error("Ledger inconsistency: {0}")]
    Inconsistency(String),
}
