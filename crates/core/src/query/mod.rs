//! Filterable queries over operations.
//!
//! A filter set maps field names to predicates; all predicates combine
//! with logical AND. The engine compiles a set against the custom-field
//! schema, then evaluates the compiled matcher per operation, sorts the
//! result, and computes grouped totals for the statistics panel.
//!
//! # Modules
//!
//! - `types` - Operators, predicates, saved queries, sorting, totals keys
//! - `error` - Filter validation errors
//! - `engine` - Compilation, matching, sorting, aggregation

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{CompiledQuery, FieldCatalog, QueryEngine};
pub use error::QueryError;
pub use types::{
    FilterOperator, FilterPredicate, FilterSet, SavedQuery, SortKey, SortOrder, SortSpec,
    TotalsKey, merge_filter_sets,
};
