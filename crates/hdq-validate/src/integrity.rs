//! Referential integrity between the two tables.
//!
//! Single pass over each table: identifier uniqueness within a table,
//! then appointment-to-patient foreign keys against a set built from the
//! patients. Orphaned appointments are flagged in place, never removed.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use hdq_model::{Appointment, IssueKind, IssueSeverity, Patient, ValidationIssue};

/// Integrity findings, split by the table they belong to.
#[derive(Debug, Default)]
pub struct IntegrityOutcome {
    pub patient_issues: Vec<ValidationIssue>,
    pub appointment_issues: Vec<ValidationIssue>,
    pub orphan_count: usize,
}

fn duplicate_issues<'a>(
    ids: impl Iterator<Item = &'a str>,
    field: &str,
) -> Vec<ValidationIssue> {
    let mut positions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, id) in ids.enumerate() {
        if !id.is_empty() {
            positions.entry(id).or_default().push(idx);
        }
    }
    positions
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(id, rows)| ValidationIssue {
            record_id: id.to_string(),
            field: Some(field.to_string()),
            kind: IssueKind::DuplicateKey,
            severity: IssueSeverity::Error,
            message: format!("'{id}' occurs {} times", rows.len()),
            rows,
        })
        .collect()
}

/// Validates identifiers and foreign keys. Sets `patient_ref_valid` on
/// every appointment as a side effect.
pub fn validate_integrity(
    patients: &[Patient],
    appointments: &mut [Appointment],
) -> IntegrityOutcome {
    let mut outcome = IntegrityOutcome {
        patient_issues: duplicate_issues(
            patients.iter().map(|patient| patient.patient_id.as_str()),
            "patient_id",
        ),
        appointment_issues: duplicate_issues(
            appointments
                .iter()
                .map(|appointment| appointment.appointment_id.as_str()),
            "appointment_id",
        ),
        orphan_count: 0,
    };

    let known: BTreeSet<&str> = patients
        .iter()
        .map(|patient| patient.patient_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    for (idx, appointment) in appointments.iter_mut().enumerate() {
        let reference = appointment.patient_id.as_str();
        appointment.patient_ref_valid = !reference.is_empty() && known.contains(reference);
        if !appointment.patient_ref_valid {
            outcome.orphan_count += 1;
            let message = if reference.is_empty() {
                "appointment has no patient reference".to_string()
            } else {
                format!("patient '{reference}' does not exist")
            };
            outcome.appointment_issues.push(ValidationIssue {
                record_id: appointment.appointment_id.clone(),
                field: Some("patient_id".to_string()),
                kind: IssueKind::OrphanReference,
                severity: IssueSeverity::Error,
                message,
                rows: vec![idx],
            });
        }
    }
    debug!(
        orphans = outcome.orphan_count,
        duplicate_patients = outcome.patient_issues.len(),
        "integrity pass complete"
    );
    outcome
}
