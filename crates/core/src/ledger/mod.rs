//! Account balances and ledger delta computation.
//!
//! An account's balance is an invariant derived from its ledger-effective
//! operations. This module computes the signed deltas; the store applies
//! them under per-account serialization.
//!
//! # Modules
//!
//! - `types` - Accounts, operation kinds, postings
//! - `error` - Ledger error types
//! - `service` - Post/reverse/repost delta computation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{Account, LedgerView, OperationKind, Posting, RepostPlan};
