use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{HdqError, Result};
use crate::quality::QualityWeights;
use crate::schema::{appointments_schema, patients_schema};

/// Tunable knobs for the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// Fraction of unambiguous date evidence a day/month order must reach
    /// before an ambiguous value is resolved with full trust. Below the
    /// threshold the dominant order is still applied but the observed
    /// fraction is carried as the confidence.
    pub majority_threshold: f64,
    /// Pivot for expanding two-digit years. Values strictly greater than
    /// the pivot land in the previous century. `None` derives the pivot
    /// from the current year.
    pub two_digit_year_pivot: Option<i32>,
    /// Appointment dates further than this many days past today are
    /// flagged as out of range.
    pub future_horizon_days: i64,
    pub weights: QualityWeights,
    /// Per-table overrides of which fields are required, keyed by table
    /// name. An entry replaces that schema's built-in required set;
    /// tables without an entry keep the defaults.
    #[serde(default)]
    pub required_fields: BTreeMap<String, BTreeSet<String>>,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            majority_threshold: 0.6,
            two_digit_year_pivot: None,
            future_horizon_days: 730,
            weights: QualityWeights::default(),
            required_fields: BTreeMap::new(),
        }
    }
}

impl CleaningOptions {
    /// Rejects configurations that would make results meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(0.5..=1.0).contains(&self.majority_threshold) {
            return Err(HdqError::Config(format!(
                "majority_threshold must be in [0.5, 1.0], got {}",
                self.majority_threshold
            )));
        }
        if let Some(pivot) = self.two_digit_year_pivot
            && !(0..=99).contains(&pivot)
        {
            return Err(HdqError::Config(format!(
                "two_digit_year_pivot must be in [0, 99], got {pivot}"
            )));
        }
        if self.future_horizon_days < 0 {
            return Err(HdqError::Config(format!(
                "future_horizon_days must be non-negative, got {}",
                self.future_horizon_days
            )));
        }
        let weights = &self.weights;
        for (name, value) in [
            ("completeness", weights.completeness),
            ("validity", weights.validity),
            ("date_confidence", weights.date_confidence),
            ("integrity", weights.integrity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HdqError::Config(format!(
                    "weight {name} must be in [0.0, 1.0], got {value}"
                )));
            }
        }
        if (weights.sum() - 1.0).abs() > 1e-6 {
            return Err(HdqError::Config(format!(
                "weights must sum to 1.0, got {}",
                weights.sum()
            )));
        }
        for (table, fields) in &self.required_fields {
            let schema = match table.as_str() {
                "patients" => patients_schema(),
                "appointments" => appointments_schema(),
                _ => {
                    return Err(HdqError::Config(format!(
                        "required_fields table must be patients or appointments, got {table}"
                    )));
                }
            };
            for field in fields {
                if schema.field(field).is_none() {
                    return Err(HdqError::Config(format!(
                        "required_fields: table {table} has no field {field}"
                    )));
                }
            }
        }
        Ok(())
    }
}
