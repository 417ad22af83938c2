//! One repository per entity, backed by concurrent in-memory maps.
//!
//! Repositories are dumb containers: they clone entities out and never
//! run business logic. All balance mutations go through
//! [`AccountRepository::apply_delta`] while the service holds the
//! account's lock.

pub mod account;
pub mod category;
pub mod custom_field;
pub mod operation;
pub mod saved_query;

pub use account::AccountRepository;
pub use category::CategoryRepository;
pub use custom_field::CustomFieldRepository;
pub use operation::OperationRepository;
pub use saved_query::SavedQueryRepository;
