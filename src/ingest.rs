//! CSV ingestion and rendering
//!
//! Readers are deliberately permissive: rows may be ragged, headers
//! may differ in case or carry a BOM. Anything structural enough to
//! matter is caught later by schema validation, not here.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::AnalysisError;
use crate::table::{RawTable, REQUIRED_COLUMNS};
use crate::types::HealthSeries;

/// Read a CSV document from a string.
pub fn read_csv_str(data: &str) -> Result<RawTable, AnalysisError> {
    read_csv_reader(data.as_bytes())
}

/// Read a CSV document from any reader.
///
/// The first record is taken as the header row. Cells are trimmed and
/// short rows are allowed; missing cells read back as empty.
pub fn read_csv_reader<R: io::Read>(reader: R) -> Result<RawTable, AnalysisError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable::new(columns, rows))
}

/// Read a CSV document from a file on disk.
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<RawTable, AnalysisError> {
    let file = File::open(path)?;
    read_csv_reader(io::BufReader::new(file))
}

/// Render a raw table back to CSV text, cells untouched.
pub fn table_to_csv(table: &RawTable) -> Result<String, AnalysisError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    finish(writer)
}

/// Render a cleaned series as CSV.
///
/// The five schema columns come first, followed by the union of extra
/// keys in sorted order. Numbers are written in their shortest exact
/// form, so reading the output back reproduces the series.
pub fn series_to_csv(series: &HealthSeries) -> Result<String, AnalysisError> {
    let mut extra_keys: BTreeSet<String> = BTreeSet::new();
    for record in series.iter() {
        extra_keys.extend(record.extras.keys().cloned());
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let mut header: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(extra_keys.iter().cloned());
    writer.write_record(&header)?;

    for record in series.iter() {
        let mut row = vec![
            record.date.to_string(),
            record.sleep_hours.to_string(),
            record.steps.to_string(),
            record.exercise_minutes.to_string(),
            record.heart_rate.to_string(),
        ];
        for key in &extra_keys {
            row.push(record.extras.get(key).cloned().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, AnalysisError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_basic_csv() {
        let table = read_csv_str(
            "date,sleep_hours,steps,exercise_minutes,heart_rate\n\
             2024-01-01,7.2,9000,30,68\n\
             2024-01-02,6.9,8500,25,71\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.cell(0, 0), "2024-01-01");
        assert_eq!(table.cell(1, 4), "71");
    }

    #[test]
    fn header_case_and_bom_resolve_to_the_schema() {
        let table = read_csv_str(
            "\u{feff}Date,Sleep_Hours,Steps,Exercise_Minutes,Heart_Rate\n\
             2024-01-01,7.2,9000,30,68\n",
        )
        .unwrap();

        assert!(table.missing_required_columns().is_empty());
        // Original header text survives ingestion.
        assert_eq!(table.columns[1], "Sleep_Hours");
    }

    #[test]
    fn cells_are_trimmed() {
        let table = read_csv_str(
            "date,sleep_hours,steps,exercise_minutes,heart_rate\n\
             2024-01-01 , 7.2 ,9000,30,68\n",
        )
        .unwrap();
        assert_eq!(table.cell(0, 0), "2024-01-01");
        assert_eq!(table.cell(0, 1), "7.2");
    }

    #[test]
    fn short_rows_read_back_as_empty_cells() {
        let table = read_csv_str(
            "date,sleep_hours,steps,exercise_minutes,heart_rate\n\
             2024-01-01,7.2\n",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 1), "7.2");
        assert_eq!(table.cell(0, 4), "");
    }

    #[test]
    fn empty_input_gives_an_empty_table() {
        let table = read_csv_str("").unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn table_round_trips_through_csv() {
        let original = read_csv_str(
            "date,sleep_hours,steps,exercise_minutes,heart_rate,mood\n\
             2024-01-01,7.2,9000,30,68,good\n\
             2024-01-02,6.9,8500,25,71,tired\n",
        )
        .unwrap();

        let rendered = table_to_csv(&original).unwrap();
        let reread = read_csv_str(&rendered).unwrap();
        assert_eq!(original, reread);
    }

    #[test]
    fn series_csv_lists_extras_after_the_schema_columns() {
        let table = read_csv_str(
            "date,sleep_hours,steps,exercise_minutes,heart_rate,mood,location\n\
             2024-01-01,7.2,9000,30,68,good,home\n",
        )
        .unwrap();
        let series = cleaner::clean(&table).unwrap();

        let csv = series_to_csv(&series).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "date,sleep_hours,steps,exercise_minutes,heart_rate,location,mood"
        );
        assert!(csv.lines().nth(1).unwrap().ends_with("home,good"));
    }

    #[test]
    fn reads_from_a_file_path() {
        let path = std::env::temp_dir().join(format!("healthtrend-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "date,sleep_hours,steps,exercise_minutes,heart_rate\n\
             2024-01-01,7.2,9000,30,68\n",
        )
        .unwrap();

        let table = read_csv_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_csv_path("/nonexistent/healthtrend.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
