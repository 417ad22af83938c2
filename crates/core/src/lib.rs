//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or storage
//! dependencies. All domain types, state machines, and calculations live here.
//!
//! # Modules
//!
//! - `temporal` - Date/time/timezone normalization for operation instants
//! - `workflow` - Approval state machine for operations
//! - `ledger` - Account balance deltas and reposting
//! - `operation` - Operation domain types and inputs
//! - `query` - Filter compilation, sorting, and grouped totals
//! - `export` - Tabular (CSV) export of operation listings

pub mod export;
pub mod ledger;
pub mod operation;
pub mod query;
pub mod temporal;
pub mod workflow;
