//! Ledger domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use tally_shared::types::{AccountId, Currency, Money, ProjectId};

use crate::workflow::ApprovalState;

/// Whether an operation adds to or removes from its account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Credits the account.
    Income,
    /// Debits the account.
    Expense,
}

impl OperationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the opposite kind.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monetary account owned by a project.
///
/// `balance` is authoritative and equals the sum of signed amounts of
/// ledger-effective operations posted against the account. It is mutated
/// only through the ledger, never directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Opaque currency tag (e.g. "EUR").
    pub currency: Currency,
    /// Running balance.
    pub balance: Money,
}

impl Account {
    /// Creates an account with a zero starting balance.
    #[must_use]
    pub fn new(project_id: ProjectId, name: &str, currency: Currency) -> Self {
        Self {
            id: AccountId::new(),
            project_id,
            name: name.to_string(),
            currency,
            balance: Money::ZERO,
        }
    }
}

/// The slice of an operation the ledger needs to compute deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerView {
    /// Target account.
    pub account_id: AccountId,
    /// Income or expense.
    pub kind: OperationKind,
    /// Positive magnitude.
    pub amount: Money,
    /// Approval state, consulted when the workflow is enabled.
    pub approval: ApprovalState,
}

/// A single balance adjustment against one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Account whose balance changes.
    pub account_id: AccountId,
    /// Signed balance delta.
    pub delta: Money,
}

/// The balance adjustments for one atomic repost.
///
/// Same-account edits collapse into a single posting so a concurrent
/// reader never observes a balance reflecting neither the old nor the
/// new amount. Cross-account moves carry one posting per account and
/// must be applied both-or-neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepostPlan {
    /// Postings to apply, at most one per account.
    pub postings: Vec<Posting>,
}

impl RepostPlan {
    /// Returns true if the repost changes no balance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Accounts touched by this plan.
    #[must_use]
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.postings.iter().map(|p| p.account_id).collect()
    }
}
