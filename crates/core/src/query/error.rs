//! Filter validation errors.

use thiserror::Error;

use super::types::FilterOperator;

/// Errors raised while compiling a filter set.
///
/// Invalid filters fail loudly instead of silently matching everything.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The filter referenced a field that does not exist or is not
    /// filterable.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// The operator does not apply to the field.
    #[error("Operator {operator} is not supported for field {field}")]
    UnsupportedOperator {
        /// Field name as supplied.
        field: String,
        /// The rejected operator.
        operator: FilterOperator,
    },

    /// A filter value could not be parsed for the field's type.
    #[error("Invalid value {value:?} for field {field}")]
    InvalidValue {
        /// Field name as supplied.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// The operator requires at least one value and none was given.
    #[error("Filter on field {0} requires at least one value")]
    MissingValues(String),
}
