use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::correction::DateCorrectionResult;

/// A patient demographic record. Read once from the source table, mutated
/// in place by the normalization pass, never deleted — only flagged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: Option<String>,
    /// Birth date exactly as it appeared in the source.
    pub birth_date_raw: Option<String>,
    /// Normalized birth date, filled by the date-correction pass.
    pub birth_date: Option<NaiveDate>,
    pub birth_date_correction: Option<DateCorrectionResult>,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// An appointment record referencing a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    /// Appointment date exactly as it appeared in the source.
    pub date_raw: Option<String>,
    /// Normalized appointment date, filled by the date-correction pass.
    pub date: Option<NaiveDate>,
    pub date_correction: Option<DateCorrectionResult>,
    pub specialty: Option<String>,
    pub physician: Option<String>,
    pub cost: Option<f64>,
    pub status: Option<String>,
    /// Set by the integrity pass. Orphaned appointments are flagged,
    /// never dropped.
    pub patient_ref_valid: bool,
}

/// Appointment status vocabulary.
pub const APPOINTMENT_STATUSES: &[&str] = &[
    "Scheduled",
    "Completed",
    "Cancelled",
    "Rescheduled",
    "Unscheduled",
];

/// Specialty vocabulary for the appointments table.
pub const SPECIALTIES: &[&str] = &[
    "Cardiology",
    "Neurology",
    "Pediatrics",
    "Gynecology",
    "Orthopedics",
];
