//! Library components of the hospital data quality CLI.

pub mod logging;
pub mod pipeline;
pub mod types;
