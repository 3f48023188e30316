//! Row-level checks. Each returns the affected row numbers in ascending order.

use std::collections::HashSet;

use crate::table::ParsedRow;

/// Column-name fragments that mark a column as numeric.
const NUMERIC_COLUMN_MARKERS: &[&str] = &["id", "numero"];

/// Rows where any header column is blank after trimming. A missing cell counts as blank.
pub fn empty_values(rows: &[ParsedRow], headers: &[String]) -> Vec<i32> {
    rows.iter()
        .filter(|row| {
            headers
                .iter()
                .any(|column| row.value(column).trim().is_empty())
        })
        .map(|row| row.row_number)
        .collect()
}

fn is_numeric_column(column: &str) -> bool {
    let lowered = column.to_lowercase();
    NUMERIC_COLUMN_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn parses_as_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Rows where a non-empty value in a numeric column (name contains "id" or
/// "numero", case-insensitive) does not parse as a floating-point number.
pub fn incorrect_types(rows: &[ParsedRow], headers: &[String]) -> Vec<i32> {
    let numeric_columns: Vec<&String> = headers
        .iter()
        .filter(|column| is_numeric_column(column))
        .collect();

    if numeric_columns.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .filter(|row| {
            numeric_columns.iter().any(|column| {
                let value = row.value(column);
                !value.is_empty() && !parses_as_number(value)
            })
        })
        .map(|row| row.row_number)
        .collect()
}

/// Rows whose content repeats an earlier row. The first occurrence is never
/// flagged; column order does not matter.
pub fn duplicates(rows: &[ParsedRow]) -> Vec<i32> {
    let mut seen: HashSet<(Vec<(&str, &str)>, &[String])> = HashSet::with_capacity(rows.len());
    let mut flagged = Vec::new();

    for row in rows {
        let mut pairs: Vec<(&str, &str)> = row
            .data
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
            .collect();
        pairs.sort_unstable();

        if !seen.insert((pairs, row.overflow.as_slice())) {
            flagged.push(row.row_number);
        }
    }

    flagged
}

/// Rows whose physical cell count differs from the header width.
pub fn invalid_format(rows: &[ParsedRow], headers: &[String]) -> Vec<i32> {
    rows.iter()
        .filter(|row| row.field_count != headers.len())
        .map(|row| row.row_number)
        .collect()
}
