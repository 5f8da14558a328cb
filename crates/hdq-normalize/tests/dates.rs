//! End-to-end behavior of the date correction engine.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use hdq_model::{CleaningOptions, CorrectionKind, DateOrder};
use hdq_normalize::{DateFormatStats, DateNormalizer};

fn engine_with_pivot(stats: DateFormatStats) -> DateNormalizer {
    let options = CleaningOptions {
        two_digit_year_pivot: Some(26),
        ..Default::default()
    };
    DateNormalizer::new(&options, stats)
}

#[test]
fn dominant_day_first_dataset_resolves_ambiguity() {
    // Nine unambiguous day-first values and one month-first value.
    let mut values: Vec<String> = (13..22).map(|day| format!("{day}/06/2023")).collect();
    values.push("06/13/2023".to_string());
    let stats = DateFormatStats::collect(values.iter().map(String::as_str));
    let engine = engine_with_pivot(stats);

    let result = engine.normalize("05/03/2024");
    assert!(result.is_ambiguous);
    assert_eq!(result.to_iso(), "2024-03-05");
    assert_eq!(result.interpretation, Some(DateOrder::DayFirst));
    assert!((result.confidence - 0.9).abs() < 1e-9);
}

#[test]
fn month_first_dataset_flips_the_reading() {
    let stats = DateFormatStats::collect(["12/25/2023", "06/13/2023", "01/31/2024"]);
    let engine = engine_with_pivot(stats);

    let result = engine.normalize("05/03/2024");
    assert!(result.is_ambiguous);
    assert_eq!(result.to_iso(), "2024-05-03");
    assert_eq!(result.interpretation, Some(DateOrder::MonthFirst));
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn unambiguous_values_ignore_the_vote() {
    // Even in a month-first dataset, 25 cannot be a month.
    let stats = DateFormatStats {
        day_first: 0,
        month_first: 50,
    };
    let engine = engine_with_pivot(stats);
    let result = engine.normalize("25/12/2023");
    assert!(!result.is_ambiguous);
    assert_eq!(result.to_iso(), "2023-12-25");
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn evidence_collection_does_not_depend_on_row_order() {
    let values = ["25/12/2023", "06/13/2023", "05/03/2024", "31/01/2024"];
    let mut reversed = values;
    reversed.reverse();
    let forward = DateFormatStats::collect(values);
    let backward = DateFormatStats::collect(reversed);
    assert_eq!(forward, backward);

    let engine_a = engine_with_pivot(forward);
    let engine_b = engine_with_pivot(backward);
    assert_eq!(engine_a.normalize("05/03/2024"), engine_b.normalize("05/03/2024"));
}

#[test]
fn two_digit_years_expand_around_the_pivot() {
    let engine = engine_with_pivot(DateFormatStats::default());
    let old = engine.normalize("31/07/99");
    assert_eq!(old.kind, CorrectionKind::YearInference);
    assert_eq!(old.to_iso(), "1999-07-31");
    let recent = engine.normalize("31/07/03");
    assert_eq!(recent.to_iso(), "2003-07-31");
}

proptest! {
    // Normalization is idempotent: re-normalizing the ISO rendering of
    // any resolved date is a no-op with full confidence.
    #[test]
    fn normalization_is_idempotent(year in 1900i32..=2100, ordinal in 1u32..=365) {
        let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let engine = engine_with_pivot(DateFormatStats::default());
        let first = engine.normalize(&date.format("%Y-%m-%d").to_string());
        prop_assert_eq!(first.normalized, Some(date));
        let second = engine.normalize(&first.to_iso());
        prop_assert_eq!(second.normalized, Some(date));
        prop_assert_eq!(second.kind, CorrectionKind::None);
        prop_assert!(!second.is_ambiguous);
        prop_assert_eq!(second.confidence, 1.0);
    }

    // Total: every input produces a result, and a missing normalized
    // date always carries the unparseable tag with zero confidence.
    #[test]
    fn unresolved_dates_are_always_tagged(value in "\\PC{0,24}") {
        let engine = engine_with_pivot(DateFormatStats::default());
        let result = engine.normalize(&value);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        if result.normalized.is_none() {
            prop_assert_eq!(result.kind, CorrectionKind::Unparseable);
            prop_assert_eq!(result.confidence, 0.0);
        }
    }

    // Any calendar-valid day-first rendering resolves to a date whose
    // year matches, regardless of separators.
    #[test]
    fn separators_are_interchangeable(year in 1900i32..=2100, month in 1u32..=12, day in 1u32..=28) {
        let engine = engine_with_pivot(DateFormatStats::default());
        let slash = engine.normalize(&format!("{day:02}/{month:02}/{year}"));
        let dot = engine.normalize(&format!("{day:02}.{month:02}.{year}"));
        prop_assert_eq!(slash.normalized, dot.normalized);
        prop_assert_eq!(slash.normalized.map(|d| d.year()), Some(year));
    }
}
