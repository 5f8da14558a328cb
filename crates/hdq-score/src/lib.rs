//! Quality scoring over the cleaned dataset.
//!
//! Each patient is scored together with the appointments that resolve
//! to them; appointments are also scored on their own. Four component
//! fractions in [0, 1]: completeness (populated fields), validity
//! (fields free of error findings), date confidence (mean correction
//! confidence across the entity's date fields) and integrity (keys and
//! references). The composite is the weighted sum scaled to [0, 100];
//! table and dataset scores are record means, so the composite of the
//! mean equals the mean of the composites.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use hdq_model::{
    Appointment, IssueKind, IssueSeverity, Patient, QualityScore, QualityWeights, ValidationReport,
};

const PATIENT_FIELDS: f64 = 8.0;
const APPOINTMENT_FIELDS: f64 = 7.0;

/// One patient's score, keyed for the report payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientScore {
    pub patient_id: String,
    #[serde(flatten)]
    pub score: QualityScore,
}

/// Scores for both tables, the record-weighted overall score and the
/// per-patient breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetScore {
    pub patients: QualityScore,
    pub appointments: QualityScore,
    pub overall: QualityScore,
    pub per_patient: Vec<PatientScore>,
}

/// Error findings indexed for per-record lookups.
struct ErrorIndex {
    /// (record_id, field) pairs with at least one error-severity finding.
    fields: BTreeSet<(String, String)>,
    /// Record ids implicated in a duplicate-key finding.
    duplicates: BTreeSet<String>,
}

impl ErrorIndex {
    fn build(report: &ValidationReport) -> Self {
        let mut fields = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for issue in &report.issues {
            if issue.kind == IssueKind::DuplicateKey {
                duplicates.insert(issue.record_id.clone());
            }
            if issue.severity == IssueSeverity::Error
                && let Some(field) = &issue.field
            {
                fields.insert((issue.record_id.clone(), field.clone()));
            }
        }
        Self { fields, duplicates }
    }

    fn error_field_count(&self, record_id: &str) -> usize {
        self.fields
            .range((record_id.to_string(), String::new())..)
            .take_while(|(id, _)| id.as_str() == record_id)
            .count()
    }
}

/// Scores entities against the validation findings of one run.
pub struct QualityScorer<'a> {
    patient_index: ErrorIndex,
    appointment_index: ErrorIndex,
    weights: &'a QualityWeights,
}

impl<'a> QualityScorer<'a> {
    pub fn new(
        patient_report: &ValidationReport,
        appointment_report: &ValidationReport,
        weights: &'a QualityWeights,
    ) -> Self {
        Self {
            patient_index: ErrorIndex::build(patient_report),
            appointment_index: ErrorIndex::build(appointment_report),
            weights,
        }
    }

    /// Scores one patient over their resolved appointments. Appointment
    /// date corrections feed the date-confidence mean, and a duplicate
    /// key on the patient or any related appointment zeroes integrity.
    pub fn score_patient(&self, patient: &Patient, related: &[&Appointment]) -> QualityScore {
        let completeness = presence(&[
            !patient.patient_id.is_empty(),
            patient.name.is_some(),
            patient.birth_date.is_some(),
            patient.age.is_some(),
            patient.sex.is_some(),
            patient.email.is_some(),
            patient.phone.is_some(),
            patient.city.is_some(),
        ]);
        let validity = validity(
            self.patient_index.error_field_count(&patient.patient_id),
            PATIENT_FIELDS,
        );
        let mut confidences: Vec<f64> = Vec::new();
        if let Some(correction) = &patient.birth_date_correction {
            confidences.push(correction.confidence);
        }
        for appointment in related {
            if let Some(correction) = &appointment.date_correction {
                confidences.push(correction.confidence);
            }
        }
        let date_confidence = if confidences.is_empty() {
            1.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };
        let clean = !self.patient_index.duplicates.contains(&patient.patient_id)
            && related.iter().all(|appointment| {
                appointment.patient_ref_valid
                    && !self
                        .appointment_index
                        .duplicates
                        .contains(&appointment.appointment_id)
            });
        let integrity = if clean { 1.0 } else { 0.0 };
        compose(
            completeness,
            validity,
            date_confidence,
            integrity,
            self.weights,
        )
    }

    pub fn score_appointment(&self, appointment: &Appointment) -> QualityScore {
        let completeness = presence(&[
            !appointment.appointment_id.is_empty(),
            !appointment.patient_id.is_empty(),
            appointment.date.is_some(),
            appointment.specialty.is_some(),
            appointment.physician.is_some(),
            appointment.cost.is_some(),
            appointment.status.is_some(),
        ]);
        let validity = validity(
            self.appointment_index
                .error_field_count(&appointment.appointment_id),
            APPOINTMENT_FIELDS,
        );
        let date_confidence = appointment
            .date_correction
            .as_ref()
            .map_or(1.0, |correction| correction.confidence);
        let integrity = if appointment.patient_ref_valid
            && !self
                .appointment_index
                .duplicates
                .contains(&appointment.appointment_id)
        {
            1.0
        } else {
            0.0
        };
        compose(
            completeness,
            validity,
            date_confidence,
            integrity,
            self.weights,
        )
    }
}

fn validity(error_fields: usize, total_fields: f64) -> f64 {
    (1.0 - error_fields as f64 / total_fields).max(0.0)
}

fn presence(present: &[bool]) -> f64 {
    let populated = present.iter().filter(|flag| **flag).count();
    populated as f64 / present.len() as f64
}

fn compose(
    completeness: f64,
    validity: f64,
    date_confidence: f64,
    integrity: f64,
    weights: &QualityWeights,
) -> QualityScore {
    let composite = (weights.completeness * completeness
        + weights.validity * validity
        + weights.date_confidence * date_confidence
        + weights.integrity * integrity)
        * 100.0;
    QualityScore {
        completeness,
        validity,
        date_confidence,
        integrity,
        composite,
    }
}

fn mean(scores: &[QualityScore], weights: &QualityWeights) -> QualityScore {
    if scores.is_empty() {
        // An empty table has nothing wrong with it.
        return compose(1.0, 1.0, 1.0, 1.0, weights);
    }
    let count = scores.len() as f64;
    let sum = |component: fn(&QualityScore) -> f64| {
        scores.iter().map(component).sum::<f64>() / count
    };
    compose(
        sum(|score| score.completeness),
        sum(|score| score.validity),
        sum(|score| score.date_confidence),
        sum(|score| score.integrity),
        weights,
    )
}

/// Groups appointments under the patient they resolve to. Orphans stay
/// out: their reference never reached a patient.
fn related_appointments(appointments: &[Appointment]) -> BTreeMap<&str, Vec<&Appointment>> {
    let mut related: BTreeMap<&str, Vec<&Appointment>> = BTreeMap::new();
    for appointment in appointments {
        if appointment.patient_ref_valid {
            related
                .entry(appointment.patient_id.as_str())
                .or_default()
                .push(appointment);
        }
    }
    related
}

/// Scores the dataset. `patient_report` and `appointment_report` carry
/// the merged schema, date-range and integrity findings per table.
pub fn score_dataset(
    patients: &[Patient],
    appointments: &[Appointment],
    patient_report: &ValidationReport,
    appointment_report: &ValidationReport,
    weights: &QualityWeights,
) -> DatasetScore {
    let scorer = QualityScorer::new(patient_report, appointment_report, weights);
    let related = related_appointments(appointments);

    let per_patient: Vec<PatientScore> = patients
        .iter()
        .map(|patient| PatientScore {
            patient_id: patient.patient_id.clone(),
            score: scorer.score_patient(
                patient,
                related
                    .get(patient.patient_id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            ),
        })
        .collect();
    let patient_scores: Vec<QualityScore> = per_patient.iter().map(|entry| entry.score).collect();
    let appointment_scores: Vec<QualityScore> = appointments
        .iter()
        .map(|appointment| scorer.score_appointment(appointment))
        .collect();

    let mut combined = patient_scores.clone();
    combined.extend(appointment_scores.iter().copied());

    let score = DatasetScore {
        patients: mean(&patient_scores, weights),
        appointments: mean(&appointment_scores, weights),
        overall: mean(&combined, weights),
        per_patient,
    };
    debug!(
        patients = score.patients.composite,
        appointments = score.appointments.composite,
        overall = score.overall.composite,
        "dataset scored"
    );
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdq_model::{CorrectionKind, DateCorrectionResult, ValidationIssue};

    fn full_patient() -> Patient {
        Patient {
            patient_id: "P001".to_string(),
            name: Some("Ana Garcia".to_string()),
            birth_date_raw: Some("1985-03-12".to_string()),
            birth_date: chrono_date(1985, 3, 12),
            birth_date_correction: Some(DateCorrectionResult {
                original: "1985-03-12".to_string(),
                normalized: chrono_date(1985, 3, 12),
                is_ambiguous: false,
                kind: CorrectionKind::None,
                confidence: 1.0,
                interpretation: None,
            }),
            age: Some(39.0),
            sex: Some("F".to_string()),
            email: Some("ana@example.com".to_string()),
            phone: Some("5551234567".to_string()),
            city: Some("Madrid".to_string()),
        }
    }

    fn chrono_date(year: i32, month: u32, day: u32) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(year, month, day)
    }

    fn appointment_with_confidence(confidence: f64) -> Appointment {
        let (normalized, kind) = if confidence > 0.0 {
            (chrono_date(2024, 3, 5), CorrectionKind::FormatSwap)
        } else {
            (None, CorrectionKind::Unparseable)
        };
        Appointment {
            appointment_id: "A001".to_string(),
            patient_id: "P001".to_string(),
            patient_ref_valid: true,
            date_raw: Some("05/03/2024".to_string()),
            date: normalized,
            date_correction: Some(DateCorrectionResult {
                original: "05/03/2024".to_string(),
                normalized,
                is_ambiguous: false,
                kind,
                confidence,
                interpretation: None,
            }),
            status: Some("Scheduled".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn perfect_record_scores_one_hundred() {
        let patients = vec![full_patient()];
        let score = score_dataset(
            &patients,
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert!((score.patients.composite - 100.0).abs() < 1e-9);
        assert!((score.overall.composite - 100.0).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_lower_completeness_only() {
        let mut patient = full_patient();
        patient.email = None;
        patient.phone = None;
        let score = score_dataset(
            &[patient],
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert!((score.patients.completeness - 6.0 / 8.0).abs() < 1e-9);
        assert_eq!(score.patients.validity, 1.0);
        assert_eq!(score.patients.integrity, 1.0);
        assert!(score.patients.composite < 100.0);
    }

    #[test]
    fn error_findings_lower_validity() {
        let mut report = ValidationReport::new("patients");
        report.issues.push(ValidationIssue {
            record_id: "P001".to_string(),
            field: Some("age".to_string()),
            kind: hdq_model::IssueKind::OutOfRange,
            severity: IssueSeverity::Error,
            message: "age out of range".to_string(),
            rows: vec![0],
        });
        let score = score_dataset(
            &[full_patient()],
            &[],
            &report,
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert!((score.patients.validity - 7.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn appointment_date_confidence_flows_into_the_patient_score() {
        let patients = vec![full_patient()];
        let shaky = score_dataset(
            &patients,
            &[appointment_with_confidence(0.0)],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        let solid = score_dataset(
            &patients,
            &[appointment_with_confidence(1.0)],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        // Birth date at 1.0 and the appointment date at 0.0 average out.
        assert!((shaky.per_patient[0].score.date_confidence - 0.5).abs() < 1e-9);
        assert_eq!(solid.per_patient[0].score.date_confidence, 1.0);
        assert!(shaky.per_patient[0].score.composite < solid.per_patient[0].score.composite);
    }

    #[test]
    fn per_patient_scores_carry_entity_ids() {
        let mut second = full_patient();
        second.patient_id = "P002".to_string();
        let score = score_dataset(
            &[full_patient(), second],
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        let ids: Vec<&str> = score
            .per_patient
            .iter()
            .map(|entry| entry.patient_id.as_str())
            .collect();
        assert_eq!(ids, vec!["P001", "P002"]);
    }

    #[test]
    fn duplicate_related_appointment_zeroes_patient_integrity() {
        let mut report = ValidationReport::new("appointments");
        report.issues.push(ValidationIssue {
            record_id: "A001".to_string(),
            field: Some("appointment_id".to_string()),
            kind: hdq_model::IssueKind::DuplicateKey,
            severity: IssueSeverity::Error,
            message: "duplicate appointment_id".to_string(),
            rows: vec![0, 1],
        });
        let score = score_dataset(
            &[full_patient()],
            &[appointment_with_confidence(1.0)],
            &ValidationReport::new("patients"),
            &report,
            &QualityWeights::default(),
        );
        assert_eq!(score.per_patient[0].score.integrity, 0.0);
    }

    #[test]
    fn orphan_appointment_zeroes_integrity() {
        let appointment = Appointment {
            appointment_id: "A001".to_string(),
            patient_id: "P999".to_string(),
            patient_ref_valid: false,
            status: Some("Scheduled".to_string()),
            ..Default::default()
        };
        let score = score_dataset(
            &[],
            &[appointment],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert_eq!(score.appointments.integrity, 0.0);
    }

    #[test]
    fn orphans_do_not_attach_to_a_coincidental_patient() {
        let mut orphan = appointment_with_confidence(0.0);
        orphan.patient_ref_valid = false;
        let score = score_dataset(
            &[full_patient()],
            &[orphan],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert_eq!(score.per_patient[0].score.date_confidence, 1.0);
        assert_eq!(score.per_patient[0].score.integrity, 1.0);
    }

    #[test]
    fn records_without_dates_have_full_date_confidence() {
        let patient = Patient {
            patient_id: "P001".to_string(),
            ..Default::default()
        };
        let score = score_dataset(
            &[patient],
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert_eq!(score.patients.date_confidence, 1.0);
    }

    #[test]
    fn empty_dataset_scores_clean() {
        let score = score_dataset(
            &[],
            &[],
            &ValidationReport::new("patients"),
            &ValidationReport::new("appointments"),
            &QualityWeights::default(),
        );
        assert!((score.overall.composite - 100.0).abs() < 1e-9);
        assert!(score.per_patient.is_empty());
    }
}
