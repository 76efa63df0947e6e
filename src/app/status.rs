//! Dataset freshness report for `samarth status`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};

use crate::domain::EngineConfig;
use crate::io::ingest::load_dataset;

#[derive(Debug, Clone)]
pub struct DatasetStatus {
    pub path: PathBuf,
    pub modified: Option<DateTime<Local>>,
    pub age_hours: Option<f64>,
    pub stale_hours: f64,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_rejected: usize,
    /// Rows kept without a usable date.
    pub rows_undated: usize,
    pub latest_month: Option<NaiveDate>,
    /// Why the dataset could not be loaded, if it couldn't.
    pub load_error: Option<String>,
}

impl DatasetStatus {
    /// Missing, unloadable, or older than the staleness threshold.
    pub fn needs_refresh(&self) -> bool {
        self.load_error.is_some() || self.age_hours.is_none_or(|h| h > self.stale_hours)
    }
}

pub fn dataset_status(config: &EngineConfig, now: DateTime<Local>) -> DatasetStatus {
    let modified = file_modified(&config.dataset_path);
    let age_hours = modified.map(|m| (now - m).num_seconds() as f64 / 3600.0);

    let mut status = DatasetStatus {
        path: config.dataset_path.clone(),
        modified,
        age_hours,
        stale_hours: config.stale_hours,
        rows_read: 0,
        rows_used: 0,
        rows_rejected: 0,
        rows_undated: 0,
        latest_month: None,
        load_error: None,
    };

    match load_dataset(&config.dataset_path) {
        Ok(loaded) => {
            status.rows_read = loaded.rows_read;
            status.rows_used = loaded.rows_used();
            status.rows_rejected = loaded.row_errors.len();
            status.rows_undated = loaded.undated_rows;
            status.latest_month = loaded.dataset.latest_date();
        }
        Err(e) => status.load_error = Some(e.to_string()),
    }

    status
}

fn file_modified(path: &Path) -> Option<DateTime<Local>> {
    let meta = std::fs::metadata(path).ok()?;
    meta.modified().ok().map(DateTime::<Local>::from)
}

pub fn format_status(status: &DatasetStatus) -> String {
    let mut out = String::new();

    out.push_str("=== samarth - dataset status ===\n");
    out.push_str(&format!("Dataset: {}\n", status.path.display()));

    if let Some(err) = &status.load_error {
        out.push_str(&format!("Not available: {err}\n"));
        out.push_str("Run `samarth refresh` to fetch and prepare data.\n");
        return out;
    }

    if let Some(modified) = status.modified {
        out.push_str(&format!("Last updated: {}\n", modified.format("%Y-%m-%d %H:%M:%S")));
    }
    out.push_str(&format!(
        "Rows: {} used / {} read ({} rejected, {} undated)\n",
        status.rows_used, status.rows_read, status.rows_rejected, status.rows_undated
    ));
    if let Some(month) = status.latest_month {
        out.push_str(&format!("Latest month: {}\n", month.format("%Y-%m")));
    }
    if status.needs_refresh() {
        if let Some(age) = status.age_hours {
            out.push_str(&format!("Dataset is {age:.1} hours old. Consider refreshing.\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn config_with_dataset(dir: &Path) -> EngineConfig {
        let config = EngineConfig::in_dir(dir);
        std::fs::write(
            &config.dataset_path,
            "state,district,market,commodity,date,modal_price\n\
             Kerala,Ernakulam,Aluva,Banana,2024-05,3000\n\
             Kerala,Ernakulam,Aluva,Banana,2024-06,x\n\
             Kerala,Ernakulam,Aluva,Banana,,3100\n",
        )
        .unwrap();
        config
    }

    #[test]
    fn fresh_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_dataset(dir.path());
        let status = dataset_status(&config, Local::now());

        assert_eq!(status.rows_read, 3);
        assert_eq!(status.rows_used, 2);
        assert_eq!(status.rows_rejected, 1);
        assert_eq!(status.rows_undated, 1);
        assert_eq!(status.latest_month, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(!status.needs_refresh());

        let text = format_status(&status);
        assert!(text.contains("Rows: 2 used / 3 read (1 rejected, 1 undated)"));
        assert!(text.contains("Latest month: 2024-05"));
        assert!(!text.contains("Consider refreshing"));
    }

    #[test]
    fn stale_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_dataset(dir.path());
        let status = dataset_status(&config, Local::now() + Duration::hours(30));

        assert!(status.needs_refresh());
        assert!(format_status(&status).contains("Consider refreshing"));
    }

    #[test]
    fn missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let status = dataset_status(&EngineConfig::in_dir(dir.path()), Local::now());

        assert!(status.needs_refresh());
        assert!(status.modified.is_none());
        assert!(format_status(&status).contains("samarth refresh"));
    }
}
