use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which heuristic rule, if any, altered a raw date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    /// Value was already a valid ISO date; nothing changed.
    None,
    /// Day/month order was reinterpreted to produce a calendar-valid date.
    FormatSwap,
    /// A two-digit year was expanded to a full century via the pivot.
    YearInference,
    /// No rule produced a valid calendar date.
    Unparseable,
}

/// Day/month ordering convention of a numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    DayFirst,
    MonthFirst,
}

/// Outcome of normalizing one raw date string. Attached to the owning
/// record; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateCorrectionResult {
    pub original: String,
    /// The corrected calendar date, or `None` when unparseable.
    pub normalized: Option<NaiveDate>,
    /// True when more than one calendar-valid interpretation existed.
    pub is_ambiguous: bool,
    pub kind: CorrectionKind,
    /// Confidence in the chosen interpretation, in [0, 1].
    pub confidence: f64,
    /// The day/month order that was applied, when the input was numeric
    /// with an orderable day/month pair. Ambiguous values always record
    /// the interpretation that was chosen.
    pub interpretation: Option<DateOrder>,
}

impl DateCorrectionResult {
    pub fn unparseable(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            normalized: None,
            is_ambiguous: false,
            kind: CorrectionKind::Unparseable,
            confidence: 0.0,
            interpretation: None,
        }
    }

    /// ISO rendering of the normalized date, empty when unparseable.
    pub fn to_iso(&self) -> String {
        self.normalized
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
