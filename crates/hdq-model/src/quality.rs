use serde::{Deserialize, Serialize};

/// The four scored dimensions of dataset quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Completeness,
    Validity,
    DateConfidence,
    Integrity,
}

/// Relative weights of the score categories. Must sum to 1.0; validated
/// through `CleaningOptions::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub completeness: f64,
    pub validity: f64,
    pub date_confidence: f64,
    pub integrity: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            completeness: 0.30,
            validity: 0.30,
            date_confidence: 0.20,
            integrity: 0.20,
        }
    }
}

impl QualityWeights {
    pub fn sum(&self) -> f64 {
        self.completeness + self.validity + self.date_confidence + self.integrity
    }
}

/// Per-record quality breakdown. Each component is a fraction in [0, 1];
/// the composite is the weighted sum scaled to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub completeness: f64,
    pub validity: f64,
    pub date_confidence: f64,
    pub integrity: f64,
    pub composite: f64,
}

impl QualityScore {
    pub fn component(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Completeness => self.completeness,
            ScoreCategory::Validity => self.validity,
            ScoreCategory::DateConfidence => self.date_confidence,
            ScoreCategory::Integrity => self.integrity,
        }
    }
}
