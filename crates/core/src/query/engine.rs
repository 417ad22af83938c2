//! Filter compilation, matching, sorting, and grouped totals.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::str::FromStr;

use tally_shared::types::{
    AccountId, CategoryId, Currency, CustomFieldId, Money, OperationId, ProjectId,
};

use super::error::QueryError;
use super::types::{FilterOperator, FilterSet, SortKey, SortOrder, SortSpec, TotalsKey};
use crate::ledger::Account;
use crate::operation::{CustomFieldDef, CustomFieldFormat, CustomValue, Operation};

/// The filterable-field schema: built-in fields plus externally supplied
/// custom-field definitions.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    custom: BTreeMap<CustomFieldId, CustomFieldDef>,
}

impl FieldCatalog {
    /// Builds a catalog from custom-field definitions.
    #[must_use]
    pub fn new(defs: impl IntoIterator<Item = CustomFieldDef>) -> Self {
        Self {
            custom: defs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// Looks up a custom field by id.
    #[must_use]
    pub fn custom_field(&self, id: CustomFieldId) -> Option<&CustomFieldDef> {
        self.custom.get(&id)
    }

    /// The filter-set name for a custom field.
    #[must_use]
    pub fn field_name(id: CustomFieldId) -> String {
        format!("cf_{id}")
    }
}

/// One compiled predicate with its values parsed to the field's type.
#[derive(Debug, Clone)]
enum CompiledPredicate {
    Ids {
        operator: FilterOperator,
        ids: Vec<OperationId>,
    },
    Project {
        operator: FilterOperator,
        ids: Vec<ProjectId>,
    },
    Account {
        operator: FilterOperator,
        ids: Vec<AccountId>,
    },
    Category {
        operator: FilterOperator,
        ids: Vec<CategoryId>,
    },
    Currency {
        operator: FilterOperator,
        tags: Vec<Currency>,
    },
    Approved {
        operator: FilterOperator,
        flags: Vec<bool>,
    },
    Description {
        operator: FilterOperator,
        values: Vec<String>,
    },
    OperationDate {
        operator: FilterOperator,
        dates: Vec<NaiveDate>,
    },
    Amount {
        operator: FilterOperator,
        amounts: Vec<Money>,
    },
    Custom {
        field_id: CustomFieldId,
        operator: FilterOperator,
        values: Vec<CustomValue>,
    },
}

/// A filter set compiled into a single matcher.
#[derive(Debug, Clone, Default)]
pub struct CompiledQuery {
    predicates: Vec<CompiledPredicate>,
}

impl CompiledQuery {
    /// Evaluates the conjunction of all predicates against one operation.
    ///
    /// `account_of` resolves the operation's account for currency and
    /// project predicates; an unresolvable account never matches.
    pub fn matches<F>(&self, op: &Operation, account_of: &F) -> bool
    where
        F: Fn(AccountId) -> Option<Account>,
    {
        self.predicates.iter().all(|p| p.matches(op, account_of))
    }
}

impl CompiledPredicate {
    fn matches<F>(&self, op: &Operation, account_of: &F) -> bool
    where
        F: Fn(AccountId) -> Option<Account>,
    {
        match self {
            Self::Ids { operator, ids } => membership(*operator, ids.contains(&op.id)),
            Self::Project { operator, ids } => account_of(op.account_id)
                .is_some_and(|a| membership(*operator, ids.contains(&a.project_id))),
            Self::Account { operator, ids } => {
                membership(*operator, ids.contains(&op.account_id))
            }
            Self::Category { operator, ids } => {
                membership(*operator, ids.contains(&op.category_id))
            }
            Self::Currency { operator, tags } => account_of(op.account_id)
                .is_some_and(|a| membership(*operator, tags.contains(&a.currency))),
            Self::Approved { operator, flags } => {
                membership(*operator, flags.contains(&op.is_approved()))
            }
            Self::Description { operator, values } => match operator {
                FilterOperator::Empty => op.description.trim().is_empty(),
                FilterOperator::NotEmpty => !op.description.trim().is_empty(),
                _ => membership(*operator, values.contains(&op.description)),
            },
            Self::OperationDate { operator, dates } => {
                compare(*operator, op.occurred_at.date_naive(), dates)
            }
            Self::Amount { operator, amounts } => compare(*operator, op.amount, amounts),
            Self::Custom {
                field_id,
                operator,
                values,
            } => match_custom(*operator, op.custom_values.get(field_id), values),
        }
    }
}

/// Equality/membership evaluation; compilation guarantees the operator.
fn membership(operator: FilterOperator, contained: bool) -> bool {
    match operator {
        FilterOperator::NotEquals => !contained,
        _ => contained,
    }
}

/// Equality and range evaluation over ordered values.
fn compare<T: Ord + Copy>(operator: FilterOperator, candidate: T, values: &[T]) -> bool {
    match operator {
        FilterOperator::Equals => values.contains(&candidate),
        FilterOperator::NotEquals => !values.contains(&candidate),
        FilterOperator::GreaterOrEqual => values.first().is_some_and(|v| candidate >= *v),
        FilterOperator::LessOrEqual => values.first().is_some_and(|v| candidate <= *v),
        FilterOperator::Empty | FilterOperator::NotEmpty => false,
    }
}

fn match_custom(
    operator: FilterOperator,
    candidate: Option<&CustomValue>,
    values: &[CustomValue],
) -> bool {
    match operator {
        FilterOperator::Empty => candidate.is_none_or(CustomValue::is_empty),
        FilterOperator::NotEmpty => candidate.is_some_and(|v| !v.is_empty()),
        FilterOperator::Equals => candidate.is_some_and(|v| values.contains(v)),
        FilterOperator::NotEquals => !candidate.is_some_and(|v| values.contains(v)),
        FilterOperator::GreaterOrEqual | FilterOperator::LessOrEqual => {
            match (candidate, values.first()) {
                (Some(CustomValue::Number(c)), Some(CustomValue::Number(v))) => {
                    compare(operator, *c, &[*v])
                }
                (Some(CustomValue::Date(c)), Some(CustomValue::Date(v))) => {
                    compare(operator, *c, &[*v])
                }
                _ => false,
            }
        }
    }
}

/// Stateless query engine.
pub struct QueryEngine;

impl QueryEngine {
    /// Compiles a filter set against the field catalog.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` for unknown fields, inapplicable operators,
    /// or unparsable values; nothing ever silently matches everything.
    pub fn compile(
        filters: &FilterSet,
        catalog: &FieldCatalog,
    ) -> Result<CompiledQuery, QueryError> {
        let mut predicates = Vec::with_capacity(filters.len());

        for (field, predicate) in filters {
            let operator = predicate.operator;
            if operator.requires_values() && predicate.values.is_empty() {
                return Err(QueryError::MissingValues(field.clone()));
            }
            let values = &predicate.values;

            let compiled = match field.as_str() {
                "ids" => CompiledPredicate::Ids {
                    operator: require_membership(field, operator)?,
                    ids: parse_id_list(field, values)?,
                },
                "project_id" => CompiledPredicate::Project {
                    operator: require_membership(field, operator)?,
                    ids: parse_id_list(field, values)?,
                },
                "account_id" => CompiledPredicate::Account {
                    operator: require_membership(field, operator)?,
                    ids: parse_id_list(field, values)?,
                },
                "category_id" => CompiledPredicate::Category {
                    operator: require_membership(field, operator)?,
                    ids: parse_id_list(field, values)?,
                },
                "currency" => CompiledPredicate::Currency {
                    operator: require_membership(field, operator)?,
                    tags: values.iter().map(|v| Currency::new(v)).collect(),
                },
                "is_approved" => CompiledPredicate::Approved {
                    operator: require_membership(field, operator)?,
                    flags: values
                        .iter()
                        .map(|v| parse_bool(field, v))
                        .collect::<Result<_, _>>()?,
                },
                "description" => match operator {
                    FilterOperator::GreaterOrEqual | FilterOperator::LessOrEqual => {
                        return Err(QueryError::UnsupportedOperator {
                            field: field.clone(),
                            operator,
                        });
                    }
                    _ => CompiledPredicate::Description {
                        operator,
                        values: values.clone(),
                    },
                },
                "operation_date" => CompiledPredicate::OperationDate {
                    operator: require_comparable(field, operator)?,
                    dates: values
                        .iter()
                        .map(|v| parse_date(field, v))
                        .collect::<Result<_, _>>()?,
                },
                "amount" => CompiledPredicate::Amount {
                    operator: require_comparable(field, operator)?,
                    amounts: values
                        .iter()
                        .map(|v| {
                            Money::from_str(v).map_err(|_| QueryError::InvalidValue {
                                field: field.clone(),
                                value: v.clone(),
                            })
                        })
                        .collect::<Result<_, _>>()?,
                },
                _ => Self::compile_custom(field, operator, values, catalog)?,
            };
            predicates.push(compiled);
        }

        Ok(CompiledQuery { predicates })
    }

    fn compile_custom(
        field: &str,
        operator: FilterOperator,
        values: &[String],
        catalog: &FieldCatalog,
    ) -> Result<CompiledPredicate, QueryError> {
        let def = field
            .strip_prefix("cf_")
            .and_then(|raw| CustomFieldId::from_str(raw).ok())
            .and_then(|id| catalog.custom_field(id))
            .filter(|def| def.is_filter)
            .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

        if matches!(
            operator,
            FilterOperator::GreaterOrEqual | FilterOperator::LessOrEqual
        ) && !matches!(def.format, CustomFieldFormat::Number | CustomFieldFormat::Date)
        {
            return Err(QueryError::UnsupportedOperator {
                field: field.to_string(),
                operator,
            });
        }

        let parsed = values
            .iter()
            .map(|v| parse_custom_value(field, def.format, v))
            .collect::<Result<_, _>>()?;

        Ok(CompiledPredicate::Custom {
            field_id: def.id,
            operator,
            values: parsed,
        })
    }

    /// Sorts operations by the given spec; ties break on id ascending.
    pub fn sort(ops: &mut [Operation], spec: SortSpec) {
        ops.sort_by(|a, b| {
            let primary = match spec.key {
                SortKey::OperationDate => a.occurred_at.cmp(&b.occurred_at),
                SortKey::Amount => a.amount.cmp(&b.amount),
                SortKey::Id => a.id.cmp(&b.id),
            };
            let primary = match spec.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Sums amount magnitudes grouped by category, kind, and approval
    /// state.
    #[must_use]
    pub fn totals(ops: &[Operation]) -> BTreeMap<TotalsKey, Money> {
        let mut sums: BTreeMap<TotalsKey, Money> = BTreeMap::new();
        for op in ops {
            let key = TotalsKey {
                category_id: op.category_id,
                kind: op.kind,
                approval: op.approval,
            };
            *sums.entry(key).or_default() += op.amount;
        }
        sums
    }
}

fn require_membership(field: &str, operator: FilterOperator) -> Result<FilterOperator, QueryError> {
    match operator {
        FilterOperator::Equals | FilterOperator::NotEquals => Ok(operator),
        _ => Err(QueryError::UnsupportedOperator {
            field: field.to_string(),
            operator,
        }),
    }
}

fn require_comparable(field: &str, operator: FilterOperator) -> Result<FilterOperator, QueryError> {
    match operator {
        FilterOperator::Empty | FilterOperator::NotEmpty => Err(QueryError::UnsupportedOperator {
            field: field.to_string(),
            operator,
        }),
        _ => Ok(operator),
    }
}

/// Parses typed ids; each raw value may carry a comma-separated list.
fn parse_id_list<T: FromStr>(field: &str, values: &[String]) -> Result<Vec<T>, QueryError> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            T::from_str(v).map_err(|_| QueryError::InvalidValue {
                field: field.to_string(),
                value: v.to_string(),
            })
        })
        .collect()
}

fn parse_bool(field: &str, value: &str) -> Result<bool, QueryError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(QueryError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| QueryError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_custom_value(
    field: &str,
    format: CustomFieldFormat,
    value: &str,
) -> Result<CustomValue, QueryError> {
    let invalid = || QueryError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    };
    match format {
        CustomFieldFormat::Text => Ok(CustomValue::Text(value.to_string())),
        CustomFieldFormat::Number => value
            .trim()
            .parse()
            .map(CustomValue::Number)
            .map_err(|_| invalid()),
        CustomFieldFormat::Date => parse_date(field, value).map(CustomValue::Date),
        CustomFieldFormat::Bool => parse_bool(field, value).map(CustomValue::Bool),
    }
}
