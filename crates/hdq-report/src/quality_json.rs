//! The machine-readable quality report.
//!
//! One JSON document per run, versioned so downstream consumers can
//! detect layout changes. Findings are embedded verbatim; the document
//! is the full audit trail of the run.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use hdq_model::ValidationReport;
use hdq_normalize::NormalizeSummary;
use hdq_score::DatasetScore;

pub const QUALITY_REPORT_FILE: &str = "quality_report.json";
pub const QUALITY_REPORT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct TableSection {
    pub records: usize,
    pub errors: usize,
    pub warnings: usize,
    #[serde(flatten)]
    pub report: ValidationReport,
}

impl TableSection {
    pub fn new(records: usize, report: ValidationReport) -> Self {
        Self {
            records,
            errors: report.error_count(),
            warnings: report.warning_count(),
            report,
        }
    }
}

/// The complete run report.
#[derive(Debug, Serialize)]
pub struct QualityReport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub normalization: NormalizeSummary,
    pub patients: TableSection,
    pub appointments: TableSection,
    pub scores: DatasetScore,
}

impl QualityReport {
    pub fn new(
        normalization: NormalizeSummary,
        patients: TableSection,
        appointments: TableSection,
        scores: DatasetScore,
    ) -> Self {
        Self {
            schema_version: QUALITY_REPORT_VERSION,
            generated_at: Utc::now(),
            normalization,
            patients,
            appointments,
            scores,
        }
    }
}

pub fn write_quality_report(path: &Path, report: &QualityReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdq_model::{QualityWeights, ValidationReport};
    use hdq_score::score_dataset;

    #[test]
    fn report_round_trips_as_json() {
        let scores = score_dataset(
            &[],
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        let report = QualityReport::new(
            NormalizeSummary::default(),
            TableSection::new(0, ValidationReport::new("patients")),
            TableSection::new(0, ValidationReport::new("appointments")),
            scores,
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(QUALITY_REPORT_FILE);
        write_quality_report(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["patients"]["records"], 0);
        assert!(value["scores"]["overall"]["composite"].is_number());
        assert!(value["scores"]["per_patient"].is_array());
    }
}
