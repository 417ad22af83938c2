//! Timezone-correct normalization of operation timestamps.
//!
//! Operations arrive as a calendar date plus an optional wall-clock
//! time-of-day, interpreted in the acting user's timezone.
//!
//! # Modules
//!
//! - `error` - Temporal error types
//! - `normalizer` - Date/time/zone merging

pub mod error;
pub mod normalizer;

pub use error::TemporalError;
pub use normalizer::{TemporalNormalizer, resolve_timezone};
