//! CSV ingest for the cleaned monthly price dataset.
//!
//! This module turns the CSV written by the cleaner (or any compatible export)
//! into a [`Dataset`] that is safe to query.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep their file order)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Dataset, PriceRecord};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 5] = ["state", "district", "market", "commodity", "modal_price"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what happened to the rows that didn't make it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows kept without a usable date (excluded from date-based queries).
    pub undated_rows: usize,
}

impl LoadedDataset {
    pub fn rows_used(&self) -> usize {
        self.dataset.len()
    }
}

/// Load the dataset CSV at `path`.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open dataset '{}': {e}", path.display())))?;
    let loaded = read_dataset(file)?;
    info!(
        "Loaded {} of {} rows from {}",
        loaded.rows_used(),
        loaded.rows_read,
        path.display()
    );
    Ok(loaded)
}

/// Parse a dataset CSV from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<LoadedDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read dataset headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;
    if !header_map.contains_key("date") {
        debug!("Dataset has no `date` column; date-based queries will find nothing");
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut undated_rows = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => {
                if row.date.is_none() {
                    undated_rows += 1;
                }
                records.push(row);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        debug!("Skipped {} invalid dataset rows", row_errors.len());
    }

    Ok(LoadedDataset {
        dataset: Dataset::new(records),
        row_errors,
        rows_read,
        undated_rows,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

/// `" Modal Price "` -> `"modal_price"`.
pub(crate) fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_lowercase().replace(' ', "_")
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::new(2, format!("Missing required column: `{column}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<PriceRecord, String> {
    let state = get_required(record, header_map, "state")?.to_string();
    let commodity = get_required(record, header_map, "commodity")?.to_string();
    let market = get_required(record, header_map, "market")?.to_string();
    let district = get_optional(record, header_map, "district")
        .unwrap_or_default()
        .to_string();
    let variety = get_optional(record, header_map, "variety").map(str::to_string);

    let date = get_optional(record, header_map, "date").and_then(parse_date);

    let raw_price = get_required(record, header_map, "modal_price")?;
    let modal_price = parse_price(raw_price)
        .ok_or_else(|| format!("Invalid `modal_price` '{raw_price}' (must be a finite number >= 0)."))?;

    Ok(PriceRecord {
        state,
        district,
        market,
        commodity,
        variety,
        date,
        modal_price,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a dataset or API date.
///
/// Monthly periods (`YYYY-MM`) map to the first day of the month. Day-first
/// forms are tried before ISO because that is how Agmarknet reports arrivals.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let s = s.trim();
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    parse_month(s)
}

fn parse_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub(crate) fn parse_price(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}
