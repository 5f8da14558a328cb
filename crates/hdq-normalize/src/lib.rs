//! Heuristic normalization for hospital datasets.
//!
//! Date correction with ambiguity detection plus cleaning of the
//! demographic and appointment fields. The public entry point is
//! [`normalize_dataset`]; the date engine is exposed separately for
//! callers that only need single-value correction.

pub mod cleaning;
pub mod date;
pub mod pass;
pub mod stats;

pub use date::DateNormalizer;
pub use pass::{NormalizeSummary, normalize_dataset};
pub use stats::DateFormatStats;
