//! Core model types for the hospital data quality pipeline.
//!
//! This crate owns the shared vocabulary of the workspace: typed records,
//! field schemas, validation findings, date-correction metadata, quality
//! scores and the pipeline's configuration surface. It deliberately has no
//! I/O so every downstream crate can depend on it without pulling in the
//! ingestion or reporting stacks.

pub mod correction;
pub mod error;
pub mod issue;
pub mod options;
pub mod quality;
pub mod record;
pub mod schema;

pub use correction::{CorrectionKind, DateCorrectionResult, DateOrder};
pub use error::{HdqError, Result};
pub use issue::{IssueKind, IssueSeverity, ValidationIssue, ValidationReport};
pub use options::CleaningOptions;
pub use quality::{QualityScore, QualityWeights, ScoreCategory};
pub use record::{APPOINTMENT_STATUSES, Appointment, Patient, SPECIALTIES};
pub use schema::{FieldKind, FieldSchema, TableSchema, appointments_schema, patients_schema};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_severity() {
        let mut report = ValidationReport::new("patients");
        report.issues.push(ValidationIssue {
            record_id: "P001".to_string(),
            field: Some("age".to_string()),
            kind: IssueKind::OutOfRange,
            severity: IssueSeverity::Error,
            message: "age 250 outside [0, 120]".to_string(),
            rows: vec![3],
        });
        report.issues.push(ValidationIssue {
            record_id: "P002".to_string(),
            field: Some("email".to_string()),
            kind: IssueKind::Missing,
            severity: IssueSeverity::Warning,
            message: "email is empty".to_string(),
            rows: vec![7],
        });
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        assert_eq!(report.count_by_kind(IssueKind::Missing), 1);
    }

    #[test]
    fn correction_result_renders_iso() {
        let result = DateCorrectionResult {
            original: "05/03/2024".to_string(),
            normalized: chrono::NaiveDate::from_ymd_opt(2024, 3, 5),
            is_ambiguous: true,
            kind: CorrectionKind::FormatSwap,
            confidence: 0.8,
            interpretation: Some(DateOrder::DayFirst),
        };
        assert_eq!(result.to_iso(), "2024-03-05");
        assert!(DateCorrectionResult::unparseable("99/99/99").to_iso().is_empty());
    }

    #[test]
    fn issue_serializes_with_snake_case_kind() {
        let issue = ValidationIssue {
            record_id: "A010".to_string(),
            field: None,
            kind: IssueKind::OrphanReference,
            severity: IssueSeverity::Error,
            message: "patient P999 not found".to_string(),
            rows: vec![9],
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "orphan_reference");
        assert_eq!(json["severity"], "error");
    }
}
