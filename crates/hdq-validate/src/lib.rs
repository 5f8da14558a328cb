//! Validation passes for hospital datasets: per-field schema checks,
//! normalized date range checks, and cross-table referential integrity.
//!
//! Every validator is a pure function over the data it is given and
//! returns a complete list of findings; nothing here stops at the first
//! problem or mutates beyond the documented flags.

pub mod dates;
pub mod integrity;
pub mod schema;

pub use dates::validate_date_ranges;
pub use integrity::{IntegrityOutcome, validate_integrity};
pub use schema::validate_schema;
