//! Operation domain types and creation/update inputs.

pub mod types;

pub use types::{
    CreateOperationInput, CustomFieldDef, CustomFieldFormat, CustomValue, Operation,
    OperationCategory, UpdateOperationInput, normalize_amount,
};
