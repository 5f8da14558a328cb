//! Declarative field schemas for the two hospital tables.
//!
//! Schemas are read-only data consumed by the schema validator; the
//! built-in constructors mirror the source dataset's layout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{APPOINTMENT_STATUSES, SPECIALTIES};

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    /// A date field. Parsing and range checks for dates run through the
    /// normalization engine rather than plain coercion.
    Date,
    /// Free text restricted to a closed value set.
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Inclusive numeric bounds, applied to Integer/Float fields.
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSchema {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub fields: Vec<FieldSchema>,
}

impl TableSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Replaces the built-in required set with the given field names.
    /// Names must already be validated against the schema; unknown names
    /// are ignored here.
    #[must_use]
    pub fn with_required(mut self, required: &BTreeSet<String>) -> Self {
        for field in &mut self.fields {
            field.required = required.contains(&field.name);
        }
        self
    }
}

fn categorical(values: &[&str]) -> FieldKind {
    FieldKind::Categorical(values.iter().map(|value| (*value).to_string()).collect())
}

/// Schema for the patients table.
pub fn patients_schema() -> TableSchema {
    TableSchema {
        table: "patients".to_string(),
        fields: vec![
            FieldSchema::new("patient_id", FieldKind::Text).required(),
            FieldSchema::new("name", FieldKind::Text).required(),
            FieldSchema::new("birth_date", FieldKind::Date).required(),
            FieldSchema::new("age", FieldKind::Float).range(0.0, 120.0),
            FieldSchema::new("sex", categorical(&["M", "F"])),
            FieldSchema::new("email", FieldKind::Text),
            FieldSchema::new("phone", FieldKind::Text),
            FieldSchema::new("city", FieldKind::Text),
        ],
    }
}

/// Schema for the appointments table.
pub fn appointments_schema() -> TableSchema {
    TableSchema {
        table: "appointments".to_string(),
        fields: vec![
            FieldSchema::new("appointment_id", FieldKind::Text).required(),
            FieldSchema::new("patient_id", FieldKind::Text).required(),
            FieldSchema::new("date", FieldKind::Date),
            FieldSchema::new("specialty", categorical(SPECIALTIES)),
            FieldSchema::new("physician", FieldKind::Text),
            FieldSchema::new("cost", FieldKind::Float).range(0.0, 1000.0),
            FieldSchema::new("status", categorical(APPOINTMENT_STATUSES)),
        ],
    }
}
