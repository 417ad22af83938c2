//! Tabular export of operation listings.
//!
//! # Modules
//!
//! - `formatter` - CSV rendering of filtered listings
//! - `error` - Export failures

pub mod error;
pub mod formatter;

pub use error::ExportError;
pub use formatter::{ExportColumn, ExportService};
