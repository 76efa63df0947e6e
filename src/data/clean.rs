//! Raw Agmarknet snapshot -> monthly dataset CSV.
//!
//! Rows missing state, commodity, arrival date or any grouping key are dropped.
//! The rest are averaged per (state, district, market, commodity, month).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::Datelike;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::io::export::{MonthlyRow, write_monthly_csv};
use crate::io::ingest::{parse_date, parse_price};

/// A JSON scalar that may arrive as text or as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

impl Scalar {
    fn text(&self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Other(_) => None,
        }
    }

    fn price(&self) -> Option<f64> {
        match self {
            Scalar::Text(s) => parse_price(s),
            Scalar::Number(n) => Some(*n).filter(|v| v.is_finite() && *v >= 0.0),
            Scalar::Other(_) => None,
        }
    }
}

/// One record of the raw snapshot. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub state: Option<Scalar>,
    pub district: Option<Scalar>,
    pub market: Option<Scalar>,
    pub commodity: Option<Scalar>,
    pub arrival_date: Option<Scalar>,
    pub modal_price: Option<Scalar>,
}

#[derive(Debug, Clone)]
pub struct CleanReport {
    pub rows: Vec<MonthlyRow>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

type GroupKey = (String, String, String, String, i32, u32);

/// Aggregate raw records to monthly mean modal prices, sorted by group key.
pub fn clean_records(raw: &[RawRecord]) -> CleanReport {
    let text = |v: &Option<Scalar>| v.as_ref().and_then(Scalar::text);

    let mut groups: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
    let mut rows_dropped = 0usize;

    for r in raw {
        let date = text(&r.arrival_date).and_then(|s| parse_date(&s));
        let (Some(state), Some(district), Some(market), Some(commodity), Some(date)) = (
            text(&r.state),
            text(&r.district),
            text(&r.market),
            text(&r.commodity),
            date,
        ) else {
            rows_dropped += 1;
            continue;
        };

        let entry = groups
            .entry((state, district, market, commodity, date.year(), date.month()))
            .or_insert((0.0, 0));
        if let Some(p) = r.modal_price.as_ref().and_then(Scalar::price) {
            entry.0 += p;
            entry.1 += 1;
        }
    }

    let rows = groups
        .into_iter()
        .filter(|(_, (_, n))| *n > 0)
        .map(|((state, district, market, commodity, year, month), (sum, n))| MonthlyRow {
            state,
            district,
            market,
            commodity,
            month: format!("{year:04}-{month:02}"),
            modal_price: sum / n as f64,
        })
        .collect();

    CleanReport {
        rows,
        rows_read: raw.len(),
        rows_dropped,
    }
}

/// Read the raw JSON snapshot, aggregate it, and write the dataset CSV.
///
/// Nothing is written when the snapshot is missing, malformed, or yields no rows.
pub fn clean_snapshot(raw_path: &Path, out_path: &Path) -> Result<CleanReport, AppError> {
    let file = File::open(raw_path)
        .map_err(|e| AppError::new(2, format!("Failed to open raw snapshot '{}': {e}", raw_path.display())))?;
    let raw: Vec<RawRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid raw snapshot JSON: {e}")))?;

    let report = clean_records(&raw);
    if report.rows.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after cleaning."));
    }

    write_monthly_csv(out_path, &report.rows)?;
    info!(
        "Cleaned {} records into {} monthly rows -> {}",
        report.rows_read,
        report.rows.len(),
        out_path.display()
    );
    Ok(report)
}
