//! CSV ingestion for the hospital data quality pipeline.
//!
//! Reads the two source tables into raw string tables plus typed records.
//! Ingestion is deliberately forgiving: malformed numeric cells become
//! `None` on the typed side and are reported later by schema validation
//! against the raw table.

pub mod csv_table;
pub mod dataset;
pub mod records;

pub use csv_table::{CsvTable, is_null_like, present, read_csv_table};
pub use dataset::{APPOINTMENTS_FILE, Dataset, PATIENTS_FILE};
pub use records::{appointments_from_table, patients_from_table};
