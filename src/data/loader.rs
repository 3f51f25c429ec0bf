use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::model::{Record, Table};

/// Columns the loader requires in the header row.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "country",
    "source",
    "production_m3",
    "service_hours",
    "production_m3_per_hour",
];

/// Cell values read as a missing measurement, the dataframe reader default.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Both variants are terminal for the current render cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Error: The file '{}' was not found. Please ensure your data is saved correctly.", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("An error occurred while loading or parsing the data: {message}")]
    Parse { message: String },
}

impl LoadError {
    fn parse(message: impl Into<String>) -> Self {
        LoadError::Parse {
            message: message.into(),
        }
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read from the file (header excluded).
    pub total_rows: usize,
    /// Rows dropped because their date did not parse.
    pub dropped_rows: usize,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the production table from a CSV file.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    load_with_report(path).map(|(table, _)| table)
}

/// Like [`load`], also returning how many rows were read and dropped.
///
/// CSV layout: header row with at least [`REQUIRED_COLUMNS`]; extra columns
/// are ignored. Rows whose `date` is not a strict `YYYY-MM-DD` calendar date
/// are skipped without error. Measurement cells matching [`NA_TOKENS`] become
/// `NaN`, as do trailing fields missing from a short row.
pub fn load_with_report(path: &Path) -> Result<(Table, LoadReport), LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::parse(format!("opening CSV: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| LoadError::parse(format!("reading CSV headers: {e}")))?
        .clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::parse(format!("CSV missing '{required}' column")));
        }
    }

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = row_no + 2;
        let mut record =
            result.map_err(|e| LoadError::parse(format!("CSV line {line}: {e}")))?;
        // short rows: missing trailing cells read as empty
        while record.len() < headers.len() {
            record.push_field("");
        }
        let row: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| LoadError::parse(format!("CSV line {line}: {e}")))?;
        report.total_rows += 1;

        let Some(date) = parse_strict_date(&row.date) else {
            log::debug!("Dropping line {line}: unparseable date '{}'", row.date);
            report.dropped_rows += 1;
            continue;
        };

        records.push(Record {
            date,
            country: row.country,
            source: row.source,
            production_m3: row.production_m3,
            service_hours: row.service_hours,
            production_m3_per_hour: row.production_m3_per_hour,
        });
    }

    if report.dropped_rows > 0 {
        log::info!(
            "Dropped {} of {} rows with invalid dates from {}",
            report.dropped_rows,
            report.total_rows,
            path.display()
        );
    }

    Ok((Table::new(records), report))
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// A padded short row arrives with empty trailing cells: an empty date (the
/// row is dropped), empty categories, `NaN` measurements.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    country: String,
    source: String,
    #[serde(deserialize_with = "measurement")]
    production_m3: f64,
    #[serde(deserialize_with = "measurement")]
    service_hours: f64,
    #[serde(deserialize_with = "measurement")]
    production_m3_per_hour: f64,
}

fn measurement<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let cell = String::deserialize(deserializer)?;
    let cell = cell.trim();
    if NA_TOKENS.contains(&cell) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("'{cell}' is not a number")))
}

/// Parse `YYYY-MM-DD` with exactly four year digits and two month and day
/// digits. Anything else, including impossible dates, yields `None`.
pub fn parse_strict_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits_ok = b
        .iter()
        .enumerate()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "date,country,source,production_m3,service_hours,production_m3_per_hour";

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn strict_date_accepts_only_full_iso_dates() {
        assert!(parse_strict_date("2023-01-31").is_some());
        assert!(parse_strict_date("2023-13-40").is_none());
        assert!(parse_strict_date("2023-02-30").is_none());
        assert!(parse_strict_date("2023-1-05").is_none());
        assert!(parse_strict_date("23-01-05").is_none());
        assert!(parse_strict_date("2023/01/05").is_none());
        assert!(parse_strict_date("+023-01-05").is_none());
        assert!(parse_strict_date("").is_none());
    }

    #[test]
    fn drops_rows_with_invalid_dates_and_keeps_order() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2023-01-02,CountryB,SourceY,200,20,10\n\
             2023-13-40,CountryA,SourceX,100,10,10\n\
             2023-01-01,CountryA,SourceX,300,30,10\n\
             not-a-date,CountryA,SourceX,1,1,1\n"
        ));

        let (table, report) = load_with_report(file.path()).unwrap();
        assert_eq!(report, LoadReport { total_rows: 4, dropped_rows: 2 });
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].country, "CountryB");
        assert_eq!(table.records()[1].production_m3, 300.0);
        assert!(table.records().iter().all(|r| r.production_m3 != 100.0));
    }

    #[test]
    fn ignores_extra_columns_in_any_order() {
        let file = write_csv(
            "note,production_m3_per_hour,source,date,service_hours,country,production_m3\n\
             hello,12.5,Well,2022-06-01,8,Kenya,100\n",
        );
        let table = load(file.path()).unwrap();
        let r = &table.records()[0];
        assert_eq!(r.country, "Kenya");
        assert_eq!(r.source, "Well");
        assert_eq!(r.production_m3_per_hour, 12.5);
        assert_eq!(r.service_hours, 8.0);
    }

    #[test]
    fn empty_measurement_becomes_nan() {
        let file = write_csv(&format!("{HEADER}\n2023-01-01,A,X,,5,\n"));
        let table = load(file.path()).unwrap();
        let r = &table.records()[0];
        assert!(r.production_m3.is_nan());
        assert!(r.production_m3_per_hour.is_nan());
        assert_eq!(r.service_hours, 5.0);
    }

    #[test]
    fn na_tokens_become_nan() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2023-01-01,A,X,NA,N/A,null\n\
             2023-01-02,A,X,#N/A,NULL,None\n\
             2023-01-03,A,X,100, nan ,2.5\n"
        ));
        let table = load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        for r in &table.records()[..2] {
            assert!(r.production_m3.is_nan());
            assert!(r.service_hours.is_nan());
            assert!(r.production_m3_per_hour.is_nan());
        }
        let r = &table.records()[2];
        assert_eq!(r.production_m3, 100.0);
        assert!(r.service_hours.is_nan());
        assert_eq!(r.production_m3_per_hour, 2.5);
    }

    #[test]
    fn short_row_pads_with_nan() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2023-01-01,A,X,100\n\
             2023-01-02,A\n\
             2023-01-03,B,Y,1,2,3\n"
        ));
        let (table, report) = load_with_report(file.path()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(table.len(), 3);

        let r = &table.records()[0];
        assert_eq!(r.production_m3, 100.0);
        assert!(r.service_hours.is_nan());
        assert!(r.production_m3_per_hour.is_nan());

        let r = &table.records()[1];
        assert_eq!(r.country, "A");
        assert_eq!(r.source, "");
        assert!(r.production_m3.is_nan());

        assert_eq!(table.records()[2].production_m3_per_hour, 3.0);
    }

    #[test]
    fn row_with_only_some_categories_is_dropped_without_date() {
        let file = write_csv(&format!("{HEADER}\n,Kenya\n2023-01-01,A,X,1,1,1\n"));
        let (table, report) = load_with_report(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report, LoadReport { total_rows: 2, dropped_rows: 1 });
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let result = load(Path::new("definitely/not/here.csv"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn missing_column_is_parse_error() {
        let file = write_csv("date,country,source,production_m3\n2023-01-01,A,X,1\n");
        match load(file.path()) {
            Err(LoadError::Parse { message }) => assert!(message.contains("service_hours")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_measurement_is_parse_error() {
        let file = write_csv(&format!("{HEADER}\n2023-01-01,A,X,lots,5,1\n"));
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("An error occurred while loading or parsing the data"));
    }

    #[test]
    fn empty_file_is_parse_error() {
        let file = write_csv("");
        assert!(matches!(load(file.path()), Err(LoadError::Parse { .. })));
    }
}
