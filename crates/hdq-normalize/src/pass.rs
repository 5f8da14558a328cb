//! The normalization pass over a loaded dataset.
//!
//! Runs in two phases: a read-only pre-pass collecting day/month order
//! evidence per date column, then a mutation pass that corrects dates
//! and cleans the remaining fields in place. Records are corrected and
//! flagged, never removed.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use hdq_model::{
    APPOINTMENT_STATUSES, Appointment, CleaningOptions, CorrectionKind, DateCorrectionResult,
    Patient, SPECIALTIES,
};

use crate::cleaning::{
    clean_email, clean_phone, default_status, derive_age, normalize_name, normalize_sex,
    specialty_cost_medians,
};
use crate::date::DateNormalizer;
use crate::stats::DateFormatStats;

/// What the normalization pass did, for the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub dates_total: usize,
    pub format_swaps: usize,
    pub year_inferences: usize,
    pub unparseable_dates: usize,
    pub ambiguous_dates: usize,
    /// Ambiguous dates resolved below the configured majority threshold.
    pub low_confidence_dates: usize,
    pub ages_derived: usize,
    pub statuses_defaulted: usize,
    pub costs_filled: usize,
}

impl NormalizeSummary {
    fn record(&mut self, correction: &DateCorrectionResult, threshold: f64) {
        self.dates_total += 1;
        match correction.kind {
            CorrectionKind::None => {}
            CorrectionKind::FormatSwap => self.format_swaps += 1,
            CorrectionKind::YearInference => self.year_inferences += 1,
            CorrectionKind::Unparseable => self.unparseable_dates += 1,
        }
        if correction.is_ambiguous {
            self.ambiguous_dates += 1;
            if correction.confidence < threshold {
                self.low_confidence_dates += 1;
            }
        }
    }
}

fn canonical_vocabulary(value: &str, vocabulary: &[&str]) -> Option<String> {
    vocabulary
        .iter()
        .find(|entry| entry.eq_ignore_ascii_case(value.trim()))
        .map(|entry| (*entry).to_string())
}

/// Normalizes both tables in place. `today` anchors age derivation,
/// status defaulting and the two-digit year pivot.
pub fn normalize_dataset(
    patients: &mut [Patient],
    appointments: &mut [Appointment],
    options: &CleaningOptions,
    today: NaiveDate,
) -> NormalizeSummary {
    // Day/month order is a per-column convention: birth dates and
    // appointment dates each get their own evidence pool.
    let birth_stats = DateFormatStats::collect(
        patients
            .iter()
            .filter_map(|patient| patient.birth_date_raw.as_deref()),
    );
    let appointment_stats = DateFormatStats::collect(
        appointments
            .iter()
            .filter_map(|appointment| appointment.date_raw.as_deref()),
    );
    debug!(
        birth_day_first = birth_stats.day_first,
        birth_month_first = birth_stats.month_first,
        appointment_day_first = appointment_stats.day_first,
        appointment_month_first = appointment_stats.month_first,
        "date order evidence collected"
    );
    let birth_normalizer = DateNormalizer::new(options, birth_stats);
    let appointment_normalizer = DateNormalizer::new(options, appointment_stats);
    let mut summary = NormalizeSummary::default();

    for patient in patients.iter_mut() {
        if let Some(raw) = &patient.birth_date_raw {
            let correction = birth_normalizer.normalize(raw);
            summary.record(&correction, options.majority_threshold);
            patient.birth_date = correction.normalized;
            patient.birth_date_correction = Some(correction);
        }
        if let Some(name) = &patient.name {
            patient.name = normalize_name(name);
        }
        if let Some(sex) = &patient.sex {
            patient.sex = normalize_sex(sex);
        }
        if let Some(email) = &patient.email {
            patient.email = clean_email(email);
        }
        if let Some(phone) = &patient.phone {
            patient.phone = clean_phone(phone);
        }
        if patient.age.is_none()
            && let Some(birth_date) = patient.birth_date
            && let Some(age) = derive_age(birth_date, today)
        {
            patient.age = Some(age);
            summary.ages_derived += 1;
        }
    }

    for appointment in appointments.iter_mut() {
        if let Some(raw) = &appointment.date_raw {
            let correction = appointment_normalizer.normalize(raw);
            summary.record(&correction, options.majority_threshold);
            appointment.date = correction.normalized;
            appointment.date_correction = Some(correction);
        }
        if let Some(specialty) = &appointment.specialty {
            if let Some(canonical) = canonical_vocabulary(specialty, SPECIALTIES) {
                appointment.specialty = Some(canonical);
            }
        }
        if let Some(physician) = &appointment.physician {
            appointment.physician = normalize_name(physician);
        }
        match &appointment.status {
            Some(status) => {
                if let Some(canonical) = canonical_vocabulary(status, APPOINTMENT_STATUSES) {
                    appointment.status = Some(canonical);
                }
            }
            None => {
                appointment.status = Some(default_status(appointment.date, today));
                summary.statuses_defaulted += 1;
            }
        }
    }

    // Cost fill runs after cleaning so medians reflect canonical specialties.
    let medians = specialty_cost_medians(appointments);
    for appointment in appointments.iter_mut() {
        if appointment.cost.is_none()
            && let Some(specialty) = &appointment.specialty
            && let Some(median) = medians.get(specialty)
        {
            appointment.cost = Some(*median);
            summary.costs_filled += 1;
        }
    }

    debug!(?summary, "normalization pass complete");
    summary
}
