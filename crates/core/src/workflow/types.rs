//! Approval workflow domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval state of an operation.
///
/// The tri-state concept of the approval workflow, plus `NotApplicable`
/// for operations created while the workflow was disabled. Collapses to a
/// boolean via [`ApprovalState::is_approved`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    /// Created while the approval workflow was disabled; always counts
    /// as approved thereafter.
    NotApplicable,
    /// Awaiting approval; not yet ledger-effective.
    Pending,
    /// Explicitly approved.
    Approved,
    /// Explicitly disapproved; reversible.
    Disapproved,
}

impl ApprovalState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "not_applicable",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Disapproved => "disapproved",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_applicable" => Some(Self::NotApplicable),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "disapproved" => Some(Self::Disapproved),
            _ => None,
        }
    }

    /// Collapses the state to the boolean approval flag.
    ///
    /// `NotApplicable` reads as approved so that enabling the workflow
    /// later does not silently pull old operations out of the ledger.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::NotApplicable | Self::Approved)
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
