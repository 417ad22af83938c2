//! Operations, categories, and custom-field values.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tally_shared::types::{AccountId, CategoryId, CustomFieldId, Money, OperationId, UserId};

use crate::ledger::{LedgerError, LedgerService, LedgerView, OperationKind};
use crate::workflow::ApprovalState;

/// A grouping category for operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Whether operations in this category are income or expense.
    pub kind: OperationKind,
}

impl OperationCategory {
    /// Creates a category.
    #[must_use]
    pub fn new(name: &str, kind: OperationKind) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.to_string(),
            kind,
        }
    }
}

/// Value formats a custom field can carry.
///
/// The schema itself (which fields exist, their format, whether they are
/// filterable) is supplied by an external field-definition collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldFormat {
    /// Free text.
    Text,
    /// Decimal number.
    Number,
    /// Calendar date.
    Date,
    /// Boolean flag.
    Bool,
}

/// Definition of a custom field attachable to operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDef {
    /// Field ID.
    pub id: CustomFieldId,
    /// Display name.
    pub name: String,
    /// Value format, gating filter operator applicability.
    pub format: CustomFieldFormat,
    /// Whether the field may appear in filter sets.
    pub is_filter: bool,
}

impl CustomFieldDef {
    /// Creates a filterable field definition.
    #[must_use]
    pub fn new(name: &str, format: CustomFieldFormat) -> Self {
        Self {
            id: CustomFieldId::new(),
            name: name.to_string(),
            format,
            is_filter: true,
        }
    }
}

/// A tagged custom-field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomValue {
    /// Text value.
    Text(String),
    /// Decimal value.
    Number(Decimal),
    /// Date value.
    Date(NaiveDate),
    /// Boolean value.
    Bool(bool),
}

impl CustomValue {
    /// Returns true if the value counts as empty for filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Bool(b) => write!(f, "{}", if *b { "1" } else { "0" }),
        }
    }
}

/// A financial operation posted against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID.
    pub id: OperationId,
    /// Target account.
    pub account_id: AccountId,
    /// Grouping category.
    pub category_id: CategoryId,
    /// Income or expense; derived from the category at write time.
    pub kind: OperationKind,
    /// Positive magnitude; the ledger sign comes from `kind`.
    pub amount: Money,
    /// Free-form description.
    pub description: String,
    /// Normalized operation instant.
    pub occurred_at: DateTime<Utc>,
    /// Approval state.
    pub approval: ApprovalState,
    /// Creating user.
    pub author_id: UserId,
    /// Custom-field values keyed by field ID.
    pub custom_values: BTreeMap<CustomFieldId, CustomValue>,
}

impl Operation {
    /// Signed amount as it hits the ledger (expense negates).
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        LedgerService::signed_amount(self.kind, self.amount)
    }

    /// Collapsed approval flag.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }

    /// The slice of this operation the ledger consumes.
    #[must_use]
    pub fn ledger_view(&self) -> LedgerView {
        LedgerView {
            account_id: self.account_id,
            kind: self.kind,
            amount: self.amount,
            approval: self.approval,
        }
    }
}

/// Canonicalizes a raw signed amount against a category kind.
///
/// The stored form is a positive magnitude plus a kind: a negative input
/// flips the category's kind (an income category with amount -50 books as
/// an expense of 50). Zero is rejected.
///
/// # Errors
///
/// Returns `LedgerError::ZeroAmount` for a zero input.
pub fn normalize_amount(
    raw: Decimal,
    category_kind: OperationKind,
) -> Result<(Money, OperationKind), LedgerError> {
    if raw.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if raw.is_sign_negative() {
        Ok((Money::new(raw.abs()), category_kind.opposite()))
    } else {
        Ok((Money::new(raw), category_kind))
    }
}

/// Input record for creating an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperationInput {
    /// Target account.
    pub account_id: AccountId,
    /// Grouping category; determines the kind.
    pub category_id: CategoryId,
    /// Raw amount; sign is canonicalized via [`normalize_amount`].
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Optional wall-clock time-of-day as `HH:MM[:SS]`.
    pub time: Option<String>,
    /// Explicit approval mark, honored when the workflow is enabled.
    pub approved: Option<bool>,
    /// Custom-field values.
    #[serde(default)]
    pub custom_values: BTreeMap<CustomFieldId, CustomValue>,
}

/// Input record for updating an operation; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOperationInput {
    /// New target account.
    pub account_id: Option<AccountId>,
    /// New category.
    pub category_id: Option<CategoryId>,
    /// New raw amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New calendar date.
    pub date: Option<String>,
    /// New time-of-day; only consulted when `date` is present.
    pub time: Option<String>,
    /// New approval flag.
    pub approved: Option<bool>,
    /// Replacement custom-field values.
    pub custom_values: Option<BTreeMap<CustomFieldId, CustomValue>>,
}
