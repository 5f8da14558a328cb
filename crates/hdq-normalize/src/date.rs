//! Heuristic date correction.
//!
//! Raw date cells arrive in a mix of conventions: ISO, day-first,
//! month-first, two-digit years, and junk. Each value is normalized to a
//! calendar-valid `NaiveDate` where a defensible reading exists, with the
//! applied rule, ambiguity flag and confidence recorded alongside. Values
//! are corrected, never dropped.

use chrono::{Datelike, Local, NaiveDate};
use tracing::trace;

use hdq_model::{CleaningOptions, CorrectionKind, DateCorrectionResult, DateOrder};

use crate::stats::DateFormatStats;

/// Confidence assigned to a century inferred from a two-digit year.
const YEAR_INFERENCE_CONFIDENCE: f64 = 0.8;

/// Plausible range for four-digit years; anything outside is junk.
const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;

/// Year component of a numeric date, before century resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearToken {
    Full(i32),
    TwoDigit(i32),
}

/// A raw value split into three numeric groups with the year located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDate {
    /// `YYYY?a?b`: year leads, `a`/`b` are the day/month pair.
    YearFirst { year: i32, a: u32, b: u32 },
    /// `a?b?YYYY` or `a?b?YY`: year trails.
    YearLast { a: u32, b: u32, year: YearToken },
}

impl NumericDate {
    fn pair(&self) -> (u32, u32) {
        match *self {
            NumericDate::YearFirst { a, b, .. } | NumericDate::YearLast { a, b, .. } => (a, b),
        }
    }

    pub fn has_two_digit_year(&self) -> bool {
        matches!(
            self,
            NumericDate::YearLast {
                year: YearToken::TwoDigit(_),
                ..
            }
        )
    }
}

/// Splits a value into exactly three numeric groups on `/`, `-` or `.`.
/// Returns `None` when the shape is not a numeric date at all.
pub fn split_numeric_date(value: &str) -> Option<NumericDate> {
    let trimmed = value.trim();
    let groups: Vec<&str> = trimmed.split(['/', '-', '.']).collect();
    let [first, middle, last] = groups.as_slice() else {
        return None;
    };
    for group in [first, middle, last] {
        if group.is_empty() || !group.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
    }
    if first.len() == 4 {
        if middle.len() > 2 || last.len() > 2 {
            return None;
        }
        let year: i32 = first.parse().ok()?;
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return None;
        }
        return Some(NumericDate::YearFirst {
            year,
            a: middle.parse().ok()?,
            b: last.parse().ok()?,
        });
    }
    if first.len() <= 2 && middle.len() <= 2 {
        let year = match last.len() {
            4 => {
                let year: i32 = last.parse().ok()?;
                if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
                    return None;
                }
                YearToken::Full(year)
            }
            2 => YearToken::TwoDigit(last.parse().ok()?),
            _ => return None,
        };
        return Some(NumericDate::YearLast {
            a: first.parse().ok()?,
            b: middle.parse().ok()?,
            year,
        });
    }
    None
}

/// Expands a two-digit year around the pivot: values strictly greater
/// than the pivot belong to the previous century. A `None` pivot derives
/// it from the current year.
pub fn resolve_year(token: YearToken, pivot: Option<i32>) -> i32 {
    match token {
        YearToken::Full(year) => year,
        YearToken::TwoDigit(two) => {
            let pivot = pivot.unwrap_or_else(|| Local::now().year() % 100);
            if two > pivot { 1900 + two } else { 2000 + two }
        }
    }
}

/// Calendar-valid readings of a numeric date, at most one per order.
/// `DayFirst` reads the pair as (day, month), `MonthFirst` as (month, day).
pub fn valid_orders(numeric: &NumericDate, pivot: Option<i32>) -> Vec<(DateOrder, NaiveDate)> {
    let year = match *numeric {
        NumericDate::YearFirst { year, .. } => year,
        NumericDate::YearLast { year, .. } => resolve_year(year, pivot),
    };
    let (a, b) = numeric.pair();
    let mut orders = Vec::with_capacity(2);
    if let Some(date) = NaiveDate::from_ymd_opt(year, b, a) {
        orders.push((DateOrder::DayFirst, date));
    }
    // A symmetric pair (05/05) is a single reading, not an ambiguity.
    if a != b && let Some(date) = NaiveDate::from_ymd_opt(year, a, b) {
        orders.push((DateOrder::MonthFirst, date));
    }
    orders
}

/// Strict `YYYY-MM-DD` with zero padding.
fn parse_strict_iso(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    for (idx, byte) in bytes.iter().enumerate() {
        if idx != 4 && idx != 7 && !byte.is_ascii_digit() {
            return None;
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Normalizes raw date strings against dataset-level order evidence.
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    pivot: Option<i32>,
    stats: DateFormatStats,
}

impl DateNormalizer {
    pub fn new(options: &CleaningOptions, stats: DateFormatStats) -> Self {
        Self {
            pivot: options.two_digit_year_pivot,
            stats,
        }
    }

    /// Normalizes one raw value. Total: every input yields a result, and
    /// a `None` normalized date always carries `Unparseable`.
    pub fn normalize(&self, raw: &str) -> DateCorrectionResult {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return DateCorrectionResult::unparseable(raw);
        }
        if let Some(date) = parse_strict_iso(trimmed) {
            if !(YEAR_MIN..=YEAR_MAX).contains(&date.year()) {
                return DateCorrectionResult::unparseable(raw);
            }
            return DateCorrectionResult {
                original: raw.to_string(),
                normalized: Some(date),
                is_ambiguous: false,
                kind: CorrectionKind::None,
                confidence: 1.0,
                interpretation: None,
            };
        }
        let Some(numeric) = split_numeric_date(trimmed) else {
            trace!(value = raw, "date did not match any numeric shape");
            return DateCorrectionResult::unparseable(raw);
        };
        let orders = valid_orders(&numeric, self.pivot);
        let inferred_year = numeric.has_two_digit_year();
        match orders.as_slice() {
            [] => DateCorrectionResult::unparseable(raw),
            [(order, date)] => DateCorrectionResult {
                original: raw.to_string(),
                normalized: Some(*date),
                is_ambiguous: false,
                kind: if inferred_year {
                    CorrectionKind::YearInference
                } else {
                    CorrectionKind::FormatSwap
                },
                confidence: if inferred_year {
                    YEAR_INFERENCE_CONFIDENCE
                } else {
                    1.0
                },
                interpretation: Some(*order),
            },
            candidates => {
                let chosen = self.stats.dominant_order();
                let fraction = self.stats.dominant_fraction();
                let date = candidates
                    .iter()
                    .find(|(order, _)| *order == chosen)
                    .map(|(_, date)| *date);
                DateCorrectionResult {
                    original: raw.to_string(),
                    normalized: date,
                    is_ambiguous: true,
                    kind: if inferred_year {
                        CorrectionKind::YearInference
                    } else {
                        CorrectionKind::FormatSwap
                    },
                    confidence: if inferred_year {
                        YEAR_INFERENCE_CONFIDENCE * fraction
                    } else {
                        fraction
                    },
                    interpretation: date.map(|_| chosen),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(stats: DateFormatStats) -> DateNormalizer {
        let options = CleaningOptions {
            two_digit_year_pivot: Some(26),
            ..Default::default()
        };
        DateNormalizer::new(&options, stats)
    }

    #[test]
    fn iso_passes_through_untouched() {
        let result = normalizer(DateFormatStats::default()).normalize("2024-03-05");
        assert_eq!(result.kind, CorrectionKind::None);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.is_ambiguous);
        assert_eq!(result.to_iso(), "2024-03-05");
    }

    #[test]
    fn padded_iso_only() {
        // Unpadded ISO-ish values go through the numeric path instead.
        assert!(parse_strict_iso("2024-3-5").is_none());
        assert!(parse_strict_iso("2024-03-05").is_some());
    }

    #[test]
    fn invalid_iso_calendar_date_is_not_iso() {
        let result = normalizer(DateFormatStats::default()).normalize("2024-02-30");
        assert_eq!(result.kind, CorrectionKind::Unparseable);
        assert!(result.normalized.is_none());
    }

    #[test]
    fn unambiguous_swap_has_full_confidence() {
        let result = normalizer(DateFormatStats::default()).normalize("25/12/2023");
        assert_eq!(result.kind, CorrectionKind::FormatSwap);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.is_ambiguous);
        assert_eq!(result.to_iso(), "2023-12-25");
        assert_eq!(result.interpretation, Some(DateOrder::DayFirst));
    }

    #[test]
    fn ambiguous_resolved_by_dominant_order() {
        let stats = DateFormatStats {
            day_first: 8,
            month_first: 2,
        };
        let result = normalizer(stats).normalize("05/03/2024");
        assert!(result.is_ambiguous);
        assert_eq!(result.to_iso(), "2024-03-05");
        assert_eq!(result.interpretation, Some(DateOrder::DayFirst));
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn ambiguous_with_no_evidence_defaults_day_first() {
        let result = normalizer(DateFormatStats::default()).normalize("05/03/2024");
        assert!(result.is_ambiguous);
        assert_eq!(result.to_iso(), "2024-03-05");
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn two_digit_year_past_pivot_lands_in_previous_century() {
        let result = normalizer(DateFormatStats::default()).normalize("31/07/99");
        assert_eq!(result.kind, CorrectionKind::YearInference);
        assert_eq!(result.to_iso(), "1999-07-31");
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn two_digit_year_at_or_before_pivot_is_current_century() {
        let result = normalizer(DateFormatStats::default()).normalize("31/07/15");
        assert_eq!(result.to_iso(), "2015-07-31");
    }

    #[test]
    fn ambiguous_two_digit_year_scales_confidence() {
        let stats = DateFormatStats {
            day_first: 9,
            month_first: 1,
        };
        let result = normalizer(stats).normalize("05/03/24");
        assert_eq!(result.kind, CorrectionKind::YearInference);
        assert!(result.is_ambiguous);
        assert_eq!(result.to_iso(), "2024-03-05");
        assert!((result.confidence - 0.8 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn leap_day_valid_only_in_leap_years() {
        let engine = normalizer(DateFormatStats::default());
        assert_eq!(engine.normalize("29/02/2024").to_iso(), "2024-02-29");
        let result = engine.normalize("29/02/2023");
        assert_eq!(result.kind, CorrectionKind::Unparseable);
        assert!(result.normalized.is_none());
    }

    #[test]
    fn symmetric_pair_is_not_ambiguous() {
        let result = normalizer(DateFormatStats::default()).normalize("05/05/2024");
        assert!(!result.is_ambiguous);
        assert_eq!(result.to_iso(), "2024-05-05");
    }

    #[test]
    fn junk_is_unparseable_with_zero_confidence() {
        let engine = normalizer(DateFormatStats::default());
        for value in ["", "  ", "not a date", "99/99/9999", "12-2024", "1/2/3/4"] {
            let result = engine.normalize(value);
            assert_eq!(result.kind, CorrectionKind::Unparseable, "{value:?}");
            assert_eq!(result.confidence, 0.0);
            assert!(result.normalized.is_none());
        }
    }

    #[test]
    fn implausible_year_is_unparseable() {
        let engine = normalizer(DateFormatStats::default());
        assert_eq!(
            engine.normalize("05/03/1850").kind,
            CorrectionKind::Unparseable
        );
        assert_eq!(
            engine.normalize("2150-03-05").kind,
            CorrectionKind::Unparseable
        );
    }
}
