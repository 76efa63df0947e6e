//! File outputs: the cleaned monthly CSV and atomic file replacement.
//!
//! Every artifact this crate writes goes through [`write_atomic`], so a failed
//! refresh or a concurrent trend answer never leaves a half-written file behind.

use std::io::Write;
use std::path::Path;

use crate::error::AppError;

/// One aggregated row of the cleaned dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    pub state: String,
    pub district: String,
    pub market: String,
    pub commodity: String,
    /// `YYYY-MM`.
    pub month: String,
    pub modal_price: f64,
}

/// Write `bytes` to `path` via a temporary file in the same directory and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create directory '{}': {e}", dir.display())))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create temp file in '{}': {e}", dir.display())))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    tmp.persist(path)
        .map_err(|e| AppError::new(2, format!("Failed to replace '{}': {}", path.display(), e.error)))?;
    Ok(())
}

/// Serialize monthly rows in the dataset schema the loader expects.
pub fn monthly_csv(rows: &[MonthlyRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["state", "district", "market", "commodity", "date", "modal_price"])
        .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV header: {e}")))?;

    for r in rows {
        writer
            .write_record([
                r.state.as_str(),
                r.district.as_str(),
                r.market.as_str(),
                r.commodity.as_str(),
                r.month.as_str(),
                &format!("{:.4}", r.modal_price),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::new(2, format!("Failed to finish dataset CSV: {e}")))
}

/// Write the cleaned dataset to `path`, replacing any previous file.
pub fn write_monthly_csv(path: &Path, rows: &[MonthlyRow]) -> Result<(), AppError> {
    let bytes = monthly_csv(rows)?;
    write_atomic(path, &bytes)
}
