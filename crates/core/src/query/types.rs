//! Filter predicates, saved queries, sorting, and totals keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tally_shared::types::{CategoryId, SavedQueryId, UserId};

use crate::ledger::OperationKind;
use crate::workflow::ApprovalState;

/// Filter operators.
///
/// Equality operators take one or more values (multiple values read as
/// set membership); emptiness operators take none; comparison operators
/// apply to date and numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equal to any of the values (in-set).
    Equals,
    /// Equal to none of the values.
    NotEquals,
    /// Value absent or blank.
    Empty,
    /// Value present and non-blank.
    NotEmpty,
    /// Greater than or equal to the value.
    GreaterOrEqual,
    /// Less than or equal to the value.
    LessOrEqual,
}

impl FilterOperator {
    /// Returns the compact wire representation (`=`, `!`, `!*`, `*`,
    /// `>=`, `<=`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!",
            Self::Empty => "!*",
            Self::NotEmpty => "*",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }

    /// Parses the compact wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Equals),
            "!" => Some(Self::NotEquals),
            "!*" => Some(Self::Empty),
            "*" => Some(Self::NotEmpty),
            ">=" => Some(Self::GreaterOrEqual),
            "<=" => Some(Self::LessOrEqual),
            _ => None,
        }
    }

    /// Returns true if the operator requires at least one value.
    #[must_use]
    pub fn requires_values(&self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One predicate: an operator plus raw values, attached to a field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// The operator to apply.
    pub operator: FilterOperator,
    /// Raw values; parsed against the field's type at compile time.
    pub values: Vec<String>,
}

impl FilterPredicate {
    /// Creates a predicate.
    #[must_use]
    pub fn new(operator: FilterOperator, values: Vec<String>) -> Self {
        Self { operator, values }
    }

    /// Equality predicate with a single value.
    #[must_use]
    pub fn equals(value: &str) -> Self {
        Self::new(FilterOperator::Equals, vec![value.to_string()])
    }
}

/// A field-name → predicate mapping; predicates combine with AND.
pub type FilterSet = BTreeMap<String, FilterPredicate>;

/// Merges a saved filter set with explicit filters.
///
/// Explicit filters override or extend the saved set by field name
/// (predicate-set composition, not inheritance).
#[must_use]
pub fn merge_filter_sets(saved: &FilterSet, explicit: &FilterSet) -> FilterSet {
    let mut merged = saved.clone();
    for (field, predicate) in explicit {
        merged.insert(field.clone(), predicate.clone());
    }
    merged
}

/// A named, persisted filter set reusable across listing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    /// Query ID.
    pub id: SavedQueryId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// The persisted filter set.
    pub filters: FilterSet,
    /// Columns to display, in order.
    pub column_names: Vec<String>,
}

/// Sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Sort by operation instant.
    OperationDate,
    /// Sort by amount magnitude.
    Amount,
    /// Sort by operation id.
    Id,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A sort specification; ties always break on id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Primary sort key.
    pub key: SortKey,
    /// Direction.
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// Newest operations first.
    fn default() -> Self {
        Self {
            key: SortKey::OperationDate,
            order: SortOrder::Desc,
        }
    }
}

/// Grouping key for aggregate sums: one row per category, kind, and
/// approval state combination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TotalsKey {
    /// Grouping category.
    pub category_id: CategoryId,
    /// Income or expense.
    pub kind: OperationKind,
    /// Approval state of the group.
    pub approval: ApprovalState,
}
