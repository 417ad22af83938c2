//! In-memory entity store and the operation orchestration layer.
//!
//! Repositories hold the entities; [`service::OperationService`] composes
//! the core temporal, workflow, ledger, query, and export logic on top of
//! them, serializing balance mutations per account.
//!
//! # Modules
//!
//! - `repositories` - One repository per entity
//! - `service` - Create/update/delete/approve/query/export orchestration
//! - `error` - Store error surface

pub mod error;
pub mod repositories;
pub mod service;

pub use error::StoreError;
pub use service::{OperationService, QueryRequest, QueryResult, RequestContext};
