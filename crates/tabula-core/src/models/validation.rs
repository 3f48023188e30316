//! Validation findings reported for an uploaded CSV file

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of check that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    ParseError,
    EmptyFile,
    EmptyValues,
    IncorrectTypes,
    Duplicates,
    InvalidFormat,
    Success,
    ProcessingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One observation about a file. The serialized shape is part of the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationFinding {
    pub validation_type: ValidationType,
    pub message: String,
    /// Row numbers in ascending order (header = 1, first data row = 2).
    pub affected_rows: Vec<i32>,
    pub severity: Severity,
}

impl ValidationFinding {
    pub fn new(
        validation_type: ValidationType,
        message: impl Into<String>,
        affected_rows: Vec<i32>,
        severity: Severity,
    ) -> Self {
        Self {
            validation_type,
            message: message.into(),
            affected_rows,
            severity,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn affects_row(&self, row_number: i32) -> bool {
        self.affected_rows.binary_search(&row_number).is_ok()
    }
}

/// True when at least one finding has severity error.
pub fn has_errors(findings: &[ValidationFinding]) -> bool {
    findings.iter().any(ValidationFinding::is_error)
}
