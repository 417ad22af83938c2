//! Property tests for ledger delta computation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use tally_shared::types::{AccountId, Money};

use super::service::LedgerService;
use super::types::{LedgerView, OperationKind};
use crate::workflow::ApprovalState;

fn money_strategy() -> impl Strategy<Value = Money> {
    (1i64..10_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

fn kind_strategy() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::Income), Just(OperationKind::Expense)]
}

fn state_strategy() -> impl Strategy<Value = ApprovalState> {
    prop_oneof![
        Just(ApprovalState::NotApplicable),
        Just(ApprovalState::Pending),
        Just(ApprovalState::Approved),
        Just(ApprovalState::Disapproved),
    ]
}

prop_compose! {
    fn view_strategy(account_id: AccountId)(
        kind in kind_strategy(),
        amount in money_strategy(),
        approval in state_strategy(),
    ) -> LedgerView {
        LedgerView { account_id, kind, amount, approval }
    }
}

proptest! {
    /// A post followed by its reversal cancels exactly.
    #[test]
    fn prop_reverse_cancels_post(
        view in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(1))),
        enabled in any::<bool>(),
    ) {
        let post = LedgerService::post_delta(&view, enabled)
            .map_or(Money::ZERO, |p| p.delta);
        let reverse = LedgerService::reverse_delta(&view, enabled)
            .map_or(Money::ZERO, |p| p.delta);
        prop_assert_eq!(post + reverse, Money::ZERO);
    }

    /// A same-account repost plan nets to post(new) - post(old), so a
    /// reader sees exactly one transition from the old to the new balance.
    #[test]
    fn prop_same_account_repost_nets(
        old in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(1))),
        new in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(1))),
        enabled in any::<bool>(),
    ) {
        let plan = LedgerService::repost_plan(&old, &new, enabled);
        prop_assert!(plan.postings.len() <= 1);

        let net: Money = plan.postings.iter().map(|p| p.delta).sum();
        let expected = LedgerService::effective_amount(&new, enabled)
            - LedgerService::effective_amount(&old, enabled);
        prop_assert_eq!(net, expected);
    }

    /// A cross-account repost moves the full effect: the sum over both
    /// accounts equals the difference of effective amounts, and each
    /// account carries at most one posting.
    #[test]
    fn prop_cross_account_repost_balances(
        old in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(1))),
        new in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(2))),
        enabled in any::<bool>(),
    ) {
        let plan = LedgerService::repost_plan(&old, &new, enabled);
        prop_assert!(plan.postings.len() <= 2);

        let old_net: Money = plan
            .postings
            .iter()
            .filter(|p| p.account_id == old.account_id)
            .map(|p| p.delta)
            .sum();
        let new_net: Money = plan
            .postings
            .iter()
            .filter(|p| p.account_id == new.account_id)
            .map(|p| p.delta)
            .sum();

        prop_assert_eq!(old_net, -LedgerService::effective_amount(&old, enabled));
        prop_assert_eq!(new_net, LedgerService::effective_amount(&new, enabled));
    }

    /// Ineffective operations never produce postings.
    #[test]
    fn prop_ineffective_is_silent(
        mut view in view_strategy(AccountId::from_uuid(uuid::Uuid::from_u128(1))),
    ) {
        view.approval = ApprovalState::Pending;
        prop_assert!(LedgerService::post_delta(&view, true).is_none());
        prop_assert!(LedgerService::reverse_delta(&view, true).is_none());
    }
}
