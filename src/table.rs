//! Raw tabular input
//!
//! This module defines the untyped table accepted at the ingest boundary:
//! named columns with string cells, plus the column-matching and
//! missing-value conventions shared by the cleaner and the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns every input table must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "date",
    "sleep_hours",
    "steps",
    "exercise_minutes",
    "heart_rate",
];

/// Date formats accepted for the `date` column, tried in order.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Cell tokens treated as a missing value (case-insensitive, after trimming).
/// The empty string is also missing.
pub const MISSING_TOKENS: [&str; 5] = ["na", "n/a", "nan", "null", "none"];

/// Untyped input table: named columns and rows of string cells.
///
/// Column names keep their original text; lookup normalizes case,
/// surrounding whitespace, and a leading UTF-8 BOM. Rows may be ragged
/// when the source was a loose CSV; absent cells read as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column headers, original text preserved.
    pub columns: Vec<String>,
    /// Row cells, one `Vec<String>` per data row.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by normalized name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_column_name(name);
        self.columns
            .iter()
            .position(|c| normalize_column_name(c) == wanted)
    }

    /// Required columns absent from this table, in schema order.
    pub fn missing_required_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Columns that are not part of the required schema, original text.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| {
                let normalized = normalize_column_name(c);
                !REQUIRED_COLUMNS.contains(&normalized.as_str())
            })
            .map(String::as_str)
            .collect()
    }

    /// Cell text at (row, column), empty string when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Normalize a header for matching: trim, strip a leading UTF-8 BOM
/// (spreadsheet exports often prefix the first header with one), lowercase.
pub(crate) fn normalize_column_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// True when a cell holds a missing-value token.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    if cell.is_empty() {
        return true;
    }
    let lower = cell.to_ascii_lowercase();
    MISSING_TOKENS.contains(&lower.as_str())
}

/// Parse a date cell against the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Schema-level failures raised while turning a table into records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: unparseable {column} value '{value}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_test_table() -> RawTable {
        RawTable::new(
            vec![
                "date".to_string(),
                "sleep_hours".to_string(),
                "steps".to_string(),
                "exercise_minutes".to_string(),
                "heart_rate".to_string(),
                "mood".to_string(),
            ],
            vec![vec![
                "2024-01-15".to_string(),
                "7.5".to_string(),
                "9000".to_string(),
                "35".to_string(),
                "68".to_string(),
                "good".to_string(),
            ]],
        )
    }

    #[test]
    fn column_lookup_ignores_case_whitespace_and_bom() {
        let table = RawTable::new(
            vec![
                "\u{feff}Date".to_string(),
                " Sleep_Hours ".to_string(),
                "STEPS".to_string(),
                "exercise_minutes".to_string(),
                "heart_rate".to_string(),
            ],
            vec![],
        );

        assert_eq!(table.column_index("date"), Some(0));
        assert_eq!(table.column_index("sleep_hours"), Some(1));
        assert_eq!(table.column_index("steps"), Some(2));
        assert!(table.missing_required_columns().is_empty());
    }

    #[test]
    fn missing_required_columns_are_all_named_in_order() {
        let table = RawTable::new(
            vec!["date".to_string(), "steps".to_string()],
            vec![],
        );

        assert_eq!(
            table.missing_required_columns(),
            vec![
                "sleep_hours".to_string(),
                "exercise_minutes".to_string(),
                "heart_rate".to_string(),
            ]
        );
    }

    #[test]
    fn extra_columns_keep_original_text() {
        let table = make_test_table();
        assert_eq!(table.extra_columns(), vec!["mood"]);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = RawTable::new(
            vec!["date".to_string(), "steps".to_string()],
            vec![vec!["2024-01-15".to_string()]],
        );
        assert_eq!(table.cell(0, 0), "2024-01-15");
        assert_eq!(table.cell(0, 1), "");
    }

    #[test]
    fn missing_tokens_are_detected() {
        for cell in ["", "  ", "na", "NA", "n/a", "NaN", "null", "None"] {
            assert!(is_missing(cell), "expected '{cell}' to be missing");
        }
        for cell in ["0", "7.5", "-", "unknown"] {
            assert!(!is_missing(cell), "expected '{cell}' to be present");
        }
    }

    #[test]
    fn date_parsing_accepts_documented_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("2024/01/15"), Some(expected));
        assert_eq!(parse_date("01/15/2024"), Some(expected));
        assert_eq!(parse_date("15th of Jan"), None);
    }

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = SchemaError::MissingColumns {
            columns: vec!["sleep_hours".to_string(), "heart_rate".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: sleep_hours, heart_rate"
        );
    }
}
