use std::path::PathBuf;

use hdq_model::ValidationReport;
use hdq_normalize::NormalizeSummary;
use hdq_score::DatasetScore;

/// Everything a cleaning run produced, for the summary and exit code.
#[derive(Debug)]
pub struct CleanResult {
    pub output_dir: PathBuf,
    pub patient_count: usize,
    pub appointment_count: usize,
    /// Empty (`None`-valued) fields before and after cleaning.
    pub missing_before: usize,
    pub missing_after: usize,
    pub normalization: NormalizeSummary,
    pub patient_report: ValidationReport,
    pub appointment_report: ValidationReport,
    pub scores: DatasetScore,
    pub cleaned_patients: Option<PathBuf>,
    pub cleaned_appointments: Option<PathBuf>,
    pub quality_report: Option<PathBuf>,
    pub has_errors: bool,
}
