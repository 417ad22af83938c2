//! Post/reverse/repost delta computation.
//!
//! Pure functions: no account state lives here. The store looks up and
//! locks the affected accounts, then applies the computed postings.

use tally_shared::types::Money;

use super::types::{LedgerView, OperationKind, Posting, RepostPlan};
use crate::workflow::ApprovalService;

/// Stateless ledger arithmetic.
pub struct LedgerService;

impl LedgerService {
    /// Signed amount of an operation: expenses negate, income is positive.
    #[must_use]
    pub fn signed_amount(kind: OperationKind, amount: Money) -> Money {
        match kind {
            OperationKind::Income => amount,
            OperationKind::Expense => -amount,
        }
    }

    /// The operation's current contribution to its account balance:
    /// the signed amount when ledger-effective, zero otherwise.
    #[must_use]
    pub fn effective_amount(view: &LedgerView, workflow_enabled: bool) -> Money {
        if ApprovalService::is_ledger_effective(view.approval, workflow_enabled) {
            Self::signed_amount(view.kind, view.amount)
        } else {
            Money::ZERO
        }
    }

    /// Posting that applies an operation to its account, if any.
    #[must_use]
    pub fn post_delta(view: &LedgerView, workflow_enabled: bool) -> Option<Posting> {
        let delta = Self::effective_amount(view, workflow_enabled);
        (!delta.is_zero()).then_some(Posting {
            account_id: view.account_id,
            delta,
        })
    }

    /// Posting that reverses an operation's current ledger effect, if any.
    /// Used on delete and when an operation leaves effectiveness.
    #[must_use]
    pub fn reverse_delta(view: &LedgerView, workflow_enabled: bool) -> Option<Posting> {
        Self::post_delta(view, workflow_enabled).map(|p| Posting {
            account_id: p.account_id,
            delta: -p.delta,
        })
    }

    /// Atomic reverse-then-post plan for an edit.
    ///
    /// Same-account edits collapse to one net posting; cross-account moves
    /// produce a reversal on the old account and a post on the new one.
    #[must_use]
    pub fn repost_plan(
        old: &LedgerView,
        new: &LedgerView,
        workflow_enabled: bool,
    ) -> RepostPlan {
        let mut postings = Vec::with_capacity(2);

        if old.account_id == new.account_id {
            let delta = Self::effective_amount(new, workflow_enabled)
                - Self::effective_amount(old, workflow_enabled);
            if !delta.is_zero() {
                postings.push(Posting {
                    account_id: new.account_id,
                    delta,
                });
            }
        } else {
            if let Some(reversal) = Self::reverse_delta(old, workflow_enabled) {
                postings.push(reversal);
            }
            if let Some(post) = Self::post_delta(new, workflow_enabled) {
                postings.push(post);
            }
        }

        RepostPlan { postings }
    }
}
