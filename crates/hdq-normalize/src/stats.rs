//! Dataset-level day/month order evidence.
//!
//! Ambiguous numeric dates (both day/month readings calendar-valid) are
//! resolved by majority vote over the unambiguous dates in the same
//! dataset. This pre-pass counts only unambiguous evidence, so the vote
//! is independent of row order and of other ambiguous values.

use hdq_model::DateOrder;

use crate::date::{NumericDate, split_numeric_date, valid_orders};

/// Tally of unambiguous day/month order evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFormatStats {
    pub day_first: usize,
    pub month_first: usize,
}

impl DateFormatStats {
    /// Counts order evidence across every raw date value in a dataset.
    /// Values that are missing, non-numeric, year-first or ambiguous
    /// contribute nothing.
    pub fn collect<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut stats = Self::default();
        for value in values {
            stats.observe(value);
        }
        stats
    }

    pub fn observe(&mut self, value: &str) {
        let Some(numeric) = split_numeric_date(value) else {
            return;
        };
        // Year-first values carry no day/month order information for the
        // year-last convention vote.
        if matches!(numeric, NumericDate::YearFirst { .. }) {
            return;
        }
        let orders = valid_orders(&numeric, None);
        if let [(order, _)] = orders.as_slice() {
            match order {
                DateOrder::DayFirst => self.day_first += 1,
                DateOrder::MonthFirst => self.month_first += 1,
            }
        }
    }

    pub fn total(&self) -> usize {
        self.day_first + self.month_first
    }

    /// The order with the most evidence. Ties fall back to day-first,
    /// the convention of the source systems feeding this pipeline.
    pub fn dominant_order(&self) -> DateOrder {
        if self.month_first > self.day_first {
            DateOrder::MonthFirst
        } else {
            DateOrder::DayFirst
        }
    }

    /// Fraction of evidence supporting the dominant order, 0.5 when no
    /// evidence exists.
    pub fn dominant_fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.5;
        }
        let dominant = self.day_first.max(self.month_first);
        dominant as f64 / total as f64
    }
}
