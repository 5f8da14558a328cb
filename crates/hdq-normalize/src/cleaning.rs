//! Non-date field cleaning.
//!
//! Small, total normalizers for the free-text columns. Each returns
//! `None` when the value cannot be salvaged, leaving the gap to be
//! reported by validation rather than papered over.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use hdq_model::Appointment;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Maps the sex column's spellings onto `M`/`F`.
pub fn normalize_sex(value: &str) -> Option<String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "F" | "FEMALE" => Some("F".to_string()),
        "M" | "MALE" => Some("M".to_string()),
        _ => None,
    }
}

/// Strips formatting from a phone number, keeping it only when the digit
/// count is plausible.
pub fn clean_phone(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if (7..=15).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}

/// Lowercases and validates an email address.
pub fn clean_email(value: &str) -> Option<String> {
    let lowered = value.trim().to_ascii_lowercase();
    if EMAIL_RE.is_match(&lowered) {
        Some(lowered)
    } else {
        None
    }
}

/// Title-cases a person name, collapsing interior whitespace.
pub fn normalize_name(value: &str) -> Option<String> {
    let mut parts = Vec::new();
    for word in value.split_whitespace() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        let mut cased: String = first.to_uppercase().collect();
        cased.extend(chars.flat_map(char::to_lowercase));
        parts.push(cased);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Age in whole years at `today`, counting un-reached birthdays.
pub fn derive_age(birth_date: NaiveDate, today: NaiveDate) -> Option<f64> {
    if birth_date > today {
        return None;
    }
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    Some(f64::from(age))
}

/// Status for appointments that never recorded one: past appointments are
/// assumed completed, future ones scheduled, undated ones unscheduled.
pub fn default_status(date: Option<NaiveDate>, today: NaiveDate) -> String {
    match date {
        None => "Unscheduled".to_string(),
        Some(date) if date <= today => "Completed".to_string(),
        Some(_) => "Scheduled".to_string(),
    }
}

/// Median cost per specialty, used to fill missing costs. Specialties
/// with no priced appointments are absent from the map.
pub fn specialty_cost_medians(appointments: &[Appointment]) -> BTreeMap<String, f64> {
    let mut by_specialty: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for appointment in appointments {
        if let (Some(specialty), Some(cost)) = (&appointment.specialty, appointment.cost) {
            if cost.is_finite() {
                by_specialty.entry(specialty.clone()).or_default().push(cost);
            }
        }
    }
    by_specialty
        .into_iter()
        .map(|(specialty, mut costs)| {
            costs.sort_by(f64::total_cmp);
            let mid = costs.len() / 2;
            let median = if costs.len() % 2 == 0 {
                (costs[mid - 1] + costs[mid]) / 2.0
            } else {
                costs[mid]
            };
            (specialty, median)
        })
        .collect()
}
