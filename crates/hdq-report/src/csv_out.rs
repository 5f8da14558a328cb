//! Cleaned CSV output.
//!
//! Every row of the source survives into the cleaned file. Corrected
//! dates gain companion columns carrying the original text, the ambiguity
//! flag and the applied rule, so downstream review never loses the trail.

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use hdq_model::{Appointment, CorrectionKind, DateCorrectionResult, Patient};

pub const CLEANED_PATIENTS_FILE: &str = "patients_clean.csv";
pub const CLEANED_APPOINTMENTS_FILE: &str = "appointments_clean.csv";

fn correction_label(correction: Option<&DateCorrectionResult>) -> &'static str {
    match correction.map(|c| c.kind) {
        None | Some(CorrectionKind::None) => "none",
        Some(CorrectionKind::FormatSwap) => "format_swap",
        Some(CorrectionKind::YearInference) => "year_inference",
        Some(CorrectionKind::Unparseable) => "unparseable",
    }
}

fn ambiguous_label(correction: Option<&DateCorrectionResult>) -> &'static str {
    if correction.is_some_and(|c| c.is_ambiguous) {
        "true"
    } else {
        "false"
    }
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{v}")).unwrap_or_default()
}

pub fn write_cleaned_patients(path: &Path, patients: &[Patient]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record([
        "patient_id",
        "name",
        "birth_date",
        "birth_date_original",
        "birth_date_ambiguous",
        "birth_date_correction",
        "age",
        "sex",
        "email",
        "phone",
        "city",
    ])?;
    for patient in patients {
        let correction = patient.birth_date_correction.as_ref();
        let iso = correction.map(DateCorrectionResult::to_iso).unwrap_or_default();
        let age = number(patient.age);
        writer.write_record([
            patient.patient_id.as_str(),
            opt(patient.name.as_deref()),
            iso.as_str(),
            opt(patient.birth_date_raw.as_deref()),
            ambiguous_label(correction),
            correction_label(correction),
            age.as_str(),
            opt(patient.sex.as_deref()),
            opt(patient.email.as_deref()),
            opt(patient.phone.as_deref()),
            opt(patient.city.as_deref()),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub fn write_cleaned_appointments(path: &Path, appointments: &[Appointment]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record([
        "appointment_id",
        "patient_id",
        "date",
        "date_original",
        "date_ambiguous",
        "date_correction",
        "specialty",
        "physician",
        "cost",
        "status",
        "patient_ref_valid",
    ])?;
    for appointment in appointments {
        let correction = appointment.date_correction.as_ref();
        let iso = correction.map(DateCorrectionResult::to_iso).unwrap_or_default();
        let cost = number(appointment.cost);
        writer.write_record([
            appointment.appointment_id.as_str(),
            appointment.patient_id.as_str(),
            iso.as_str(),
            opt(appointment.date_raw.as_deref()),
            ambiguous_label(correction),
            correction_label(correction),
            opt(appointment.specialty.as_deref()),
            opt(appointment.physician.as_deref()),
            cost.as_str(),
            opt(appointment.status.as_deref()),
            if appointment.patient_ref_valid { "true" } else { "false" },
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdq_model::DateOrder;

    #[test]
    fn cleaned_patients_keep_the_original_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CLEANED_PATIENTS_FILE);
        let patients = vec![Patient {
            patient_id: "P001".to_string(),
            name: Some("Ana Garcia".to_string()),
            birth_date_raw: Some("05/03/1985".to_string()),
            birth_date: chrono::NaiveDate::from_ymd_opt(1985, 3, 5),
            birth_date_correction: Some(DateCorrectionResult {
                original: "05/03/1985".to_string(),
                normalized: chrono::NaiveDate::from_ymd_opt(1985, 3, 5),
                is_ambiguous: true,
                kind: CorrectionKind::FormatSwap,
                confidence: 0.8,
                interpretation: Some(DateOrder::DayFirst),
            }),
            age: Some(39.0),
            ..Default::default()
        }];
        write_cleaned_patients(&path, &patients).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("patient_id,name,birth_date"));
        let row = lines.next().unwrap();
        assert!(row.contains("1985-03-05"));
        assert!(row.contains("05/03/1985"));
        assert!(row.contains("format_swap"));
        assert!(row.contains("true"));
    }

    #[test]
    fn unparseable_date_leaves_normalized_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CLEANED_APPOINTMENTS_FILE);
        let appointments = vec![Appointment {
            appointment_id: "A001".to_string(),
            patient_id: "P001".to_string(),
            date_raw: Some("not a date".to_string()),
            date_correction: Some(DateCorrectionResult::unparseable("not a date")),
            status: Some("Unscheduled".to_string()),
            patient_ref_valid: true,
            ..Default::default()
        }];
        write_cleaned_appointments(&path, &appointments).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains("unparseable"));
        assert!(row.contains("not a date"));
    }
}
