//! Create/update/delete orchestration and balance accounting.

mod common;

use common::{assert_ledger_invariant, balance, ctx, harness, input};
use rust_decimal_macros::dec;

use tally_core::ledger::{Account, OperationKind};
use tally_core::operation::UpdateOperationInput;
use tally_core::temporal::resolve_timezone;
use tally_core::workflow::ApprovalState;
use tally_shared::AppError;
use tally_shared::types::{AccountId, Currency, Money};
use tally_store::StoreError;

#[test]
fn test_create_and_delete_restore_balance() {
    let h = harness();
    let ctx = ctx(false);

    h.service
        .create(&ctx, input(h.account.id, h.income.id, dec!(30)))
        .unwrap();
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(30));

    let big = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(1000)))
        .unwrap();
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(1030));
    assert_ledger_invariant(&h.service, false);

    h.service.delete(&ctx, big.id).unwrap();
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(30));
    assert!(h.service.get(big.id).is_err());
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_expense_debits_account() {
    let h = harness();
    let ctx = ctx(false);

    h.service
        .create(&ctx, input(h.account.id, h.income.id, dec!(100)))
        .unwrap();
    h.service
        .create(&ctx, input(h.account.id, h.expense.id, dec!(20)))
        .unwrap();

    assert_eq!(balance(&h.service, h.account.id), Money::from_major(80));
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_negative_amount_books_opposite_kind() {
    let h = harness();
    let ctx = ctx(false);

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(-50)))
        .unwrap();

    assert_eq!(op.kind, OperationKind::Expense);
    assert_eq!(op.amount, Money::from_major(50));
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(-50));
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_zero_amount_is_rejected() {
    let h = harness();
    let result = h
        .service
        .create(&ctx(false), input(h.account.id, h.income.id, dec!(0)));
    assert!(matches!(result, Err(StoreError::Ledger(_))));
    assert!(h.service.operations().is_empty());
}

#[test]
fn test_pending_operation_accrues_only_on_approval() {
    let h = harness();
    let ctx = ctx(true);

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(1000)))
        .unwrap();
    assert_eq!(op.approval, ApprovalState::Pending);
    assert!(balance(&h.service, h.account.id).is_zero());
    assert_ledger_invariant(&h.service, true);

    let op = h.service.set_approval(&ctx, op.id, true).unwrap();
    assert_eq!(op.approval, ApprovalState::Approved);
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(1000));
    assert_ledger_invariant(&h.service, true);

    let op = h.service.set_approval(&ctx, op.id, false).unwrap();
    assert_eq!(op.approval, ApprovalState::Disapproved);
    assert!(balance(&h.service, h.account.id).is_zero());
    assert_ledger_invariant(&h.service, true);
}

#[test]
fn test_approved_on_create_posts_immediately() {
    let h = harness();
    let ctx = ctx(true);

    let mut create = input(h.account.id, h.income.id, dec!(250));
    create.approved = Some(true);
    let op = h.service.create(&ctx, create).unwrap();

    assert_eq!(op.approval, ApprovalState::Approved);
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(250));
    assert_ledger_invariant(&h.service, true);
}

#[test]
fn test_workflow_disabled_marks_not_applicable() {
    let h = harness();
    let ctx = ctx(false);

    let mut create = input(h.account.id, h.income.id, dec!(10));
    create.approved = Some(true);
    let op = h.service.create(&ctx, create).unwrap();
    assert_eq!(op.approval, ApprovalState::NotApplicable);

    // Approval in an update is not consulted either.
    let op = h
        .service
        .update(
            &ctx,
            op.id,
            UpdateOperationInput {
                approved: Some(true),
                ..UpdateOperationInput::default()
            },
        )
        .unwrap();
    assert_eq!(op.approval, ApprovalState::NotApplicable);
}

#[test]
fn test_update_amount_reposts_difference() {
    let h = harness();
    let ctx = ctx(false);

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(100)))
        .unwrap();

    let op = h
        .service
        .update(
            &ctx,
            op.id,
            UpdateOperationInput {
                amount: Some(dec!(99.9)),
                ..UpdateOperationInput::default()
            },
        )
        .unwrap();

    assert_eq!(op.amount, Money::new(dec!(99.9)));
    assert_eq!(balance(&h.service, h.account.id), Money::new(dec!(99.9)));
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_update_category_flips_kind() {
    let h = harness();
    let ctx = ctx(false);

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(40)))
        .unwrap();

    let op = h
        .service
        .update(
            &ctx,
            op.id,
            UpdateOperationInput {
                category_id: Some(h.expense.id),
                ..UpdateOperationInput::default()
            },
        )
        .unwrap();

    assert_eq!(op.kind, OperationKind::Expense);
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(-40));
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_update_moves_operation_across_accounts() {
    let h = harness();
    let ctx = ctx(false);
    let other = Account::new(h.project_id, "Petty cash", Currency::new("EUR"));
    h.service.accounts().insert(other.clone());

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(40)))
        .unwrap();
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(40));

    h.service
        .update(
            &ctx,
            op.id,
            UpdateOperationInput {
                account_id: Some(other.id),
                ..UpdateOperationInput::default()
            },
        )
        .unwrap();

    assert!(balance(&h.service, h.account.id).is_zero());
    assert_eq!(balance(&h.service, other.id), Money::from_major(40));
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_move_to_unknown_account_changes_nothing() {
    let h = harness();
    let ctx = ctx(false);

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(40)))
        .unwrap();

    let result = h.service.update(
        &ctx,
        op.id,
        UpdateOperationInput {
            account_id: Some(AccountId::new()),
            ..UpdateOperationInput::default()
        },
    );

    assert!(matches!(result, Err(StoreError::Ledger(_))));
    assert_eq!(balance(&h.service, h.account.id), Money::from_major(40));
    assert_eq!(h.service.get(op.id).unwrap().account_id, h.account.id);
    assert_ledger_invariant(&h.service, false);
}

#[test]
fn test_create_against_unknown_account_fails() {
    let h = harness();
    let result = h
        .service
        .create(&ctx(false), input(AccountId::new(), h.income.id, dec!(5)));

    assert!(matches!(result, Err(StoreError::Ledger(_))));
    assert!(h.service.operations().is_empty());

    let app: AppError = result.unwrap_err().into();
    assert_eq!(app.status_code(), 404);
}

#[rstest::rstest]
#[case("")]
#[case("2017/04/20")]
#[case("tomorrow")]
fn test_unparsable_dates_are_rejected(#[case] date: &str) {
    let h = harness();
    let mut create = input(h.account.id, h.income.id, dec!(5));
    create.date = date.to_string();

    let result = h.service.create(&ctx(false), create);
    assert!(matches!(result, Err(StoreError::Temporal(_))));
    assert!(h.service.operations().is_empty());
}

#[test]
fn test_invalid_date_maps_to_temporal_error() {
    let h = harness();
    let mut create = input(h.account.id, h.income.id, dec!(5));
    create.date = "20-20-20".to_string();

    let result = h.service.create(&ctx(false), create);
    assert!(matches!(result, Err(StoreError::Temporal(_))));

    let app: AppError = result.unwrap_err().into();
    assert_eq!(app.error_code(), "INVALID_TEMPORAL_INPUT");
    assert!(h.service.operations().is_empty());
}

#[test]
fn test_instant_keeps_wall_clock_in_user_zone() {
    let h = harness();
    let tz = resolve_timezone("Brasilia").unwrap();
    let mut ctx = ctx(false);
    ctx.timezone = tz;

    let op = h
        .service
        .create(&ctx, input(h.account.id, h.income.id, dec!(1)))
        .unwrap();

    let rendered = op
        .occurred_at
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string();
    assert_eq!(rendered, "2017-04-20 11:11:00 -03:00");
}
