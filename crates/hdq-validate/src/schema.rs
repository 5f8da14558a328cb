//! Field-level validation of a raw table against its schema.
//!
//! Runs over the original cell text so findings quote what the source
//! actually said, not what a later pass made of it. Date cells are only
//! checked for presence here; parse quality is the correction engine's
//! concern and range checks run on the normalized dates.

use hdq_ingest::{CsvTable, is_null_like};
use hdq_model::{
    FieldKind, FieldSchema, IssueKind, IssueSeverity, TableSchema, ValidationIssue,
    ValidationReport,
};

fn record_id(table: &CsvTable, row: &[String], schema: &TableSchema, row_idx: usize) -> String {
    let id_field = &schema.fields[0].name;
    let id = table.cell(row, id_field).trim();
    if id.is_empty() {
        format!("row {row_idx}")
    } else {
        id.to_string()
    }
}

/// Validates every row of `table` against `schema`, returning the full
/// list of findings. Never short-circuits.
pub fn validate_schema(table: &CsvTable, schema: &TableSchema) -> ValidationReport {
    let mut report = ValidationReport::new(schema.table.clone());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let id = record_id(table, row, schema, row_idx);
        for field in &schema.fields {
            let value = table.cell(row, &field.name);
            if is_null_like(value) {
                if field.required {
                    report.issues.push(ValidationIssue {
                        record_id: id.clone(),
                        field: Some(field.name.clone()),
                        kind: IssueKind::Missing,
                        severity: IssueSeverity::Error,
                        message: format!("required field '{}' is missing", field.name),
                        rows: vec![row_idx],
                    });
                }
                continue;
            }
            check_value(&mut report, &id, field, value, row_idx);
        }
    }
    report
}

fn check_value(
    report: &mut ValidationReport,
    id: &str,
    field: &FieldSchema,
    value: &str,
    row_idx: usize,
) {
    match &field.kind {
        FieldKind::Text | FieldKind::Date => {}
        FieldKind::Integer => match value.trim().parse::<i64>() {
            Ok(parsed) => check_range(report, id, field, parsed as f64, value, row_idx),
            Err(_) => push_type_mismatch(report, id, field, "integer", value, row_idx),
        },
        FieldKind::Float => match lenient_number(value) {
            Some(parsed) => check_range(report, id, field, parsed, value, row_idx),
            None => push_type_mismatch(report, id, field, "number", value, row_idx),
        },
        FieldKind::Categorical(allowed) => {
            let known = allowed.iter().any(|entry| entry.eq_ignore_ascii_case(value.trim()));
            if !known {
                report.issues.push(ValidationIssue {
                    record_id: id.to_string(),
                    field: Some(field.name.clone()),
                    kind: IssueKind::OutOfRange,
                    severity: IssueSeverity::Warning,
                    message: format!(
                        "'{value}' is not one of the allowed values for '{}'",
                        field.name
                    ),
                    rows: vec![row_idx],
                });
            }
        }
    }
}

/// Same tolerance the ingestion layer applies when typing numeric cells.
fn lenient_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .replace(',', ".")
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    cleaned.parse::<f64>().ok()
}

fn check_range(
    report: &mut ValidationReport,
    id: &str,
    field: &FieldSchema,
    parsed: f64,
    value: &str,
    row_idx: usize,
) {
    let below = field.min.is_some_and(|bound| parsed < bound);
    let above = field.max.is_some_and(|bound| parsed > bound);
    if below || above {
        report.issues.push(ValidationIssue {
            record_id: id.to_string(),
            field: Some(field.name.clone()),
            kind: IssueKind::OutOfRange,
            severity: IssueSeverity::Error,
            message: format!(
                "'{value}' is outside [{}, {}] for '{}'",
                field.min.unwrap_or(f64::NEG_INFINITY),
                field.max.unwrap_or(f64::INFINITY),
                field.name
            ),
            rows: vec![row_idx],
        });
    }
}

fn push_type_mismatch(
    report: &mut ValidationReport,
    id: &str,
    field: &FieldSchema,
    expected: &str,
    value: &str,
    row_idx: usize,
) {
    report.issues.push(ValidationIssue {
        record_id: id.to_string(),
        field: Some(field.name.clone()),
        kind: IssueKind::TypeMismatch,
        severity: IssueSeverity::Error,
        message: format!("'{value}' is not a valid {expected} for '{}'", field.name),
        rows: vec![row_idx],
    });
}
