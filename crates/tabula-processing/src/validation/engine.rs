use tabula_core::models::{Severity, ValidationFinding, ValidationType};

use super::checks;
use crate::table::parse_table;

pub const EMPTY_FILE_MESSAGE: &str = "The CSV file is empty";
pub const SUCCESS_MESSAGE: &str = "The CSV file passed all validations";

/// Validate a CSV document and return the findings in report order.
///
/// Never fails: decoding problems become a single `parse_error` finding. The
/// category and description only annotate the tracing span.
#[tracing::instrument(skip(content), fields(size_bytes = content.len()))]
pub fn validate_csv(
    content: &[u8],
    category: Option<&str>,
    description: Option<&str>,
) -> Vec<ValidationFinding> {
    let table = match parse_table(content) {
        Ok(table) => table,
        Err(e) => {
            tracing::debug!(error = %e, "CSV content could not be parsed");
            return vec![ValidationFinding::new(
                ValidationType::ParseError,
                format!("Failed to process CSV file: {}", e),
                Vec::new(),
                Severity::Error,
            )];
        }
    };

    if table.rows.is_empty() {
        return vec![ValidationFinding::new(
            ValidationType::EmptyFile,
            EMPTY_FILE_MESSAGE,
            Vec::new(),
            Severity::Error,
        )];
    }

    let rows = &table.rows;
    let headers = &table.headers;

    let results = [
        (
            ValidationType::EmptyValues,
            checks::empty_values(rows, headers),
            Severity::Warning,
            "rows with empty values",
        ),
        (
            ValidationType::IncorrectTypes,
            checks::incorrect_types(rows, headers),
            Severity::Error,
            "rows with incorrect data types",
        ),
        (
            ValidationType::Duplicates,
            checks::duplicates(rows),
            Severity::Warning,
            "duplicate rows",
        ),
        (
            ValidationType::InvalidFormat,
            checks::invalid_format(rows, headers),
            Severity::Error,
            "rows with invalid format",
        ),
    ];

    let mut findings: Vec<ValidationFinding> = results
        .into_iter()
        .filter(|(_, affected, _, _)| !affected.is_empty())
        .map(|(validation_type, affected, severity, what)| {
            ValidationFinding::new(
                validation_type,
                format!("Found {} {}", affected.len(), what),
                affected,
                severity,
            )
        })
        .collect();

    if findings.is_empty() {
        findings.push(ValidationFinding::new(
            ValidationType::Success,
            SUCCESS_MESSAGE,
            Vec::new(),
            Severity::Info,
        ));
    }

    tracing::debug!(
        row_count = rows.len(),
        finding_count = findings.len(),
        "CSV validation finished"
    );

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(findings: &[ValidationFinding]) -> Vec<ValidationType> {
        findings.iter().map(|f| f.validation_type).collect()
    }

    #[test]
    fn test_clean_file_passes() {
        let findings = validate_csv(b"id,name\n1,Ann\n2,Bob\n", None, None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].validation_type, ValidationType::Success);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].message, SUCCESS_MESSAGE);
        assert!(findings[0].affected_rows.is_empty());
    }

    #[test]
    fn test_empty_value_and_duplicate_warnings() {
        let findings = validate_csv(b"id,name\n1,Ann\n2,\n1,Ann\n", Some("hr"), None);

        assert_eq!(
            types(&findings),
            vec![ValidationType::EmptyValues, ValidationType::Duplicates]
        );
        assert_eq!(findings[0].affected_rows, vec![3]);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].message, "Found 1 rows with empty values");
        assert_eq!(findings[1].affected_rows, vec![4]);
        assert_eq!(findings[1].message, "Found 1 duplicate rows");
        assert!(findings.iter().all(|f| f.severity != Severity::Error));
    }

    #[test]
    fn test_incorrect_type_error() {
        let findings = validate_csv(b"id,name\nabc,Ann\n", None, None);
        assert_eq!(types(&findings), vec![ValidationType::IncorrectTypes]);
        assert_eq!(findings[0].affected_rows, vec![2]);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].message, "Found 1 rows with incorrect data types");
    }

    #[test]
    fn test_findings_follow_fixed_order() {
        let content = b"id,name\nx,\nx,\n1,a,extra\n";
        let findings = validate_csv(content, None, None);
        assert_eq!(
            types(&findings),
            vec![
                ValidationType::EmptyValues,
                ValidationType::IncorrectTypes,
                ValidationType::Duplicates,
                ValidationType::InvalidFormat,
            ]
        );
        assert_eq!(findings[3].affected_rows, vec![4]);
        assert_eq!(findings[3].message, "Found 1 rows with invalid format");
    }

    #[test]
    fn test_header_only_is_empty_file() {
        let findings = validate_csv(b"id,name\n", None, None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].validation_type, ValidationType::EmptyFile);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].message, EMPTY_FILE_MESSAGE);

        let empty = validate_csv(b"", None, None);
        assert_eq!(types(&empty), vec![ValidationType::EmptyFile]);
    }

    #[test]
    fn test_undecodable_content_is_parse_error() {
        let findings = validate_csv(&[0xff, 0xfe, 0x00, 0x61], None, None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].validation_type, ValidationType::ParseError);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0]
            .message
            .starts_with("Failed to process CSV file: "));
        assert!(findings[0].affected_rows.is_empty());
    }

    #[test]
    fn test_affected_rows_ascending_and_within_range() {
        let content = b"a,b\n1,\n2,2\n,3\n2,2\n";
        let findings = validate_csv(content, None, None);
        for finding in &findings {
            let mut sorted = finding.affected_rows.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, finding.affected_rows);
            assert!(finding.affected_rows.iter().all(|r| (2..=5).contains(r)));
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let content = b"id,name\n1,a\n1,a\nz,\n";
        assert_eq!(
            validate_csv(content, None, None),
            validate_csv(content, Some("x"), Some("y"))
        );
    }
}
