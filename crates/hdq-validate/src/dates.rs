//! Range checks on normalized dates.
//!
//! These run after the correction pass so they see calendar-valid dates
//! only; unparseable values were already tagged upstream.

use chrono::{Days, NaiveDate};

use hdq_model::{Appointment, IssueKind, IssueSeverity, Patient, ValidationIssue};

/// Birth dates in the future are impossible; appointment dates beyond
/// the configured horizon are suspicious but bookable, so they warn.
pub fn validate_date_ranges(
    patients: &[Patient],
    appointments: &[Appointment],
    today: NaiveDate,
    future_horizon_days: i64,
) -> (Vec<ValidationIssue>, Vec<ValidationIssue>) {
    let mut patient_issues = Vec::new();
    for (idx, patient) in patients.iter().enumerate() {
        if let Some(birth_date) = patient.birth_date
            && birth_date > today
        {
            patient_issues.push(ValidationIssue {
                record_id: patient.patient_id.clone(),
                field: Some("birth_date".to_string()),
                kind: IssueKind::OutOfRange,
                severity: IssueSeverity::Error,
                message: format!("birth date {birth_date} is in the future"),
                rows: vec![idx],
            });
        }
    }

    let horizon = today
        .checked_add_days(Days::new(future_horizon_days.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX);
    let mut appointment_issues = Vec::new();
    for (idx, appointment) in appointments.iter().enumerate() {
        if let Some(date) = appointment.date
            && date > horizon
        {
            appointment_issues.push(ValidationIssue {
                record_id: appointment.appointment_id.clone(),
                field: Some("date".to_string()),
                kind: IssueKind::OutOfRange,
                severity: IssueSeverity::Warning,
                message: format!(
                    "appointment date {date} is more than {future_horizon_days} days ahead"
                ),
                rows: vec![idx],
            });
        }
    }
    (patient_issues, appointment_issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn future_birth_date_is_an_error() {
        let patients = vec![Patient {
            patient_id: "P001".to_string(),
            birth_date: Some(date(2030, 1, 1)),
            ..Default::default()
        }];
        let (patient_issues, _) =
            validate_date_ranges(&patients, &[], date(2024, 6, 1), 730);
        assert_eq!(patient_issues.len(), 1);
        assert_eq!(patient_issues[0].severity, IssueSeverity::Error);
    }

    #[test]
    fn appointment_past_horizon_warns() {
        let appointments = vec![
            Appointment {
                appointment_id: "A001".to_string(),
                date: Some(date(2024, 12, 1)),
                ..Default::default()
            },
            Appointment {
                appointment_id: "A002".to_string(),
                date: Some(date(2027, 1, 1)),
                ..Default::default()
            },
        ];
        let (_, appointment_issues) =
            validate_date_ranges(&[], &appointments, date(2024, 6, 1), 730);
        assert_eq!(appointment_issues.len(), 1);
        assert_eq!(appointment_issues[0].record_id, "A002");
        assert_eq!(appointment_issues[0].severity, IssueSeverity::Warning);
    }
}
