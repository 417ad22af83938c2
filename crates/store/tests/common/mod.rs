//! Shared fixtures for store integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use tally_core::ledger::{Account, LedgerService, OperationKind};
use tally_core::operation::{CreateOperationInput, OperationCategory};
use tally_shared::types::{AccountId, CategoryId, Currency, Money, ProjectId, UserId};
use tally_store::{OperationService, RequestContext};

/// A service seeded with one EUR account and an income and an expense
/// category.
pub struct Harness {
    pub service: OperationService,
    pub project_id: ProjectId,
    pub account: Account,
    pub income: OperationCategory,
    pub expense: OperationCategory,
}

pub fn harness() -> Harness {
    init_tracing();
    let service = OperationService::new();
    let project_id = ProjectId::new();
    let account = Account::new(project_id, "Main", Currency::new("EUR"));
    let income = OperationCategory::new("Salary", OperationKind::Income);
    let expense = OperationCategory::new("Food", OperationKind::Expense);
    service.accounts().insert(account.clone());
    service.categories().insert(income.clone());
    service.categories().insert(expense.clone());
    Harness {
        service,
        project_id,
        account,
        income,
        expense,
    }
}

pub fn ctx(workflow_enabled: bool) -> RequestContext {
    RequestContext::new(UserId::new(), chrono_tz::UTC, workflow_enabled)
}

pub fn input(
    account_id: AccountId,
    category_id: CategoryId,
    amount: Decimal,
) -> CreateOperationInput {
    CreateOperationInput {
        account_id,
        category_id,
        amount,
        description: "operation".to_string(),
        date: "2017-04-20".to_string(),
        time: Some("11:11".to_string()),
        approved: None,
        custom_values: BTreeMap::new(),
    }
}

/// Recomputes every account balance from the stored operations and
/// asserts it matches the authoritative balance.
pub fn assert_ledger_invariant(service: &OperationService, workflow_enabled: bool) {
    for account in service.accounts().list() {
        let expected: Money = service
            .operations()
            .list()
            .iter()
            .filter(|op| op.account_id == account.id)
            .map(|op| LedgerService::effective_amount(&op.ledger_view(), workflow_enabled))
            .sum();
        assert_eq!(
            account.balance, expected,
            "balance drift on account {}",
            account.name
        );
    }
}

pub fn balance(service: &OperationService, id: AccountId) -> Money {
    service.accounts().get(id).unwrap().balance
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
