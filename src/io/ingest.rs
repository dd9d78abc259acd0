//! Metric file ingest.
//!
//! Each row file under `PR/<period>/` or `GHI/<period>/` is a small CSV whose
//! first column is a date and which carries one numeric metric column. This
//! module turns one such file into parallel `dates` / `values` vectors.
//!
//! Design goals:
//! - **Fail loudly**: an unparseable date or value aborts the run with the file and line
//! - **Deterministic column choice**: first numeric column, or an explicit header name
//! - **Separation of concerns**: no pairing or merging logic here

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::ColumnSelector;
use crate::error::AppError;

/// Whether the first (date) column of a file should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateColumn {
    Parse,
    Ignore,
}

/// One parsed metric file.
#[derive(Debug, Clone)]
pub struct MetricFile {
    pub path: PathBuf,
    /// Header of the column the values were taken from.
    pub value_column: String,
    /// Present when the file was read with `DateColumn::Parse`.
    pub dates: Option<Vec<NaiveDate>>,
    pub values: Vec<f64>,
}

impl MetricFile {
    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.values.len()
    }
}

/// Read one metric file: first column as dates, selected column as values.
pub fn read_metric_file(path: &Path, selector: &ColumnSelector, date_column: DateColumn) -> Result<MetricFile, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(path, format!("Failed to open metric file: {e}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(path, Some(1), format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.is_empty() {
        return Err(AppError::parse(path, Some(1), "File has no columns."));
    }

    let mut rows: Vec<(usize, StringRecord)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::parse(path, Some(idx + 2), format!("CSV parse error: {e}")))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
        rows.push((line, record));
    }

    let value_idx = select_value_column(&headers, &rows, selector).map_err(|msg| AppError::parse(path, None, msg))?;

    let mut values = Vec::with_capacity(rows.len());
    for (line, record) in &rows {
        let cell = cell(record, value_idx);
        let value = parse_value(cell).ok_or_else(|| {
            AppError::parse(
                path,
                Some(*line),
                format!("Invalid value '{cell}' in column `{}`.", &headers[value_idx]),
            )
        })?;
        values.push(value);
    }

    let dates = match date_column {
        DateColumn::Ignore => None,
        DateColumn::Parse => {
            let mut dates = Vec::with_capacity(rows.len());
            for (line, record) in &rows {
                let date = parse_date(cell(record, 0)).map_err(|msg| AppError::parse(path, Some(*line), msg))?;
                dates.push(date);
            }
            Some(dates)
        }
    };

    Ok(MetricFile {
        path: path.to_path_buf(),
        value_column: normalize_header_name(&headers[value_idx]),
        dates,
        values,
    })
}

fn select_value_column(
    headers: &StringRecord,
    rows: &[(usize, StringRecord)],
    selector: &ColumnSelector,
) -> Result<usize, String> {
    match selector {
        ColumnSelector::Named(name) => {
            let wanted = normalize_header_name(name).to_ascii_lowercase();
            headers
                .iter()
                .position(|h| normalize_header_name(h).to_ascii_lowercase() == wanted)
                .ok_or_else(|| format!("Missing required column: `{name}`"))
        }
        ColumnSelector::FirstNumeric => (1..headers.len())
            .find(|&idx| is_numeric_column(rows, idx))
            .ok_or_else(|| "No numeric column found.".to_string()),
    }
}

/// A column is numeric when it has at least one value and every non-empty cell
/// is number-shaped. `NaN` and `inf` count here; they are rejected per line later.
fn is_numeric_column(rows: &[(usize, StringRecord)], idx: usize) -> bool {
    let mut seen = false;
    for (_, record) in rows {
        let cell = cell(record, idx);
        if cell.is_empty() {
            continue;
        }
        if cell.parse::<f64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_value(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Parse a calendar date, dropping any time-of-day component.
///
/// ISO dates (`YYYY-MM-DD`) are recommended, but exports often use
/// `DD/MM/YYYY` or carry a timestamp. A small fixed set of formats keeps
/// parsing deterministic.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    let s = s.trim();
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY (optionally with a time)."
    ))
}
