use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Category of a data quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Required field is empty or absent.
    Missing,
    /// Value could not be coerced to the declared field type.
    TypeMismatch,
    /// Value falls outside the declared numeric/date range or value set.
    OutOfRange,
    /// Foreign key does not resolve to any primary record.
    OrphanReference,
    /// Identifier declared unique occurs more than once.
    DuplicateKey,
}

/// A single validation finding. Findings are data, not control flow:
/// validators accumulate them and always return a complete list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Identifier of the record the finding refers to.
    pub record_id: String,
    /// Field name, when the finding is about a specific field.
    pub field: Option<String>,
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    /// Human-readable message describing the finding.
    pub message: String,
    /// Zero-based row positions involved. Duplicate-key findings list
    /// every occurrence of the repeated identifier.
    pub rows: Vec<usize>,
}

/// Validation findings for a single table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub table: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            issues: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn count_by_kind(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }
}
