//! Approval workflow for operations.
//!
//! Governs whether a posted operation affects its account balance
//! immediately or only after explicit approval.
//!
//! # Modules
//!
//! - `types` - Approval state enum
//! - `service` - Creation/toggle transitions and ledger-effectiveness

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::ApprovalService;
pub use types::ApprovalState;
