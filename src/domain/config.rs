//! Runtime configuration resolved from the environment (and `.env`).

use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_STALE_HOURS: f64 = 24.0;

const DATASET_FILE: &str = "mandi_clean.csv";
const RAW_FILE: &str = "mandi_data.json";
const CHART_FILE: &str = "trend.svg";

/// File locations and thresholds shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Cleaned monthly CSV consumed by the engine.
    pub dataset_path: PathBuf,
    /// Raw JSON snapshot written by the fetcher.
    pub raw_path: PathBuf,
    /// Trend chart, overwritten on every trend answer.
    pub chart_path: PathBuf,
    /// Age after which `status` flags the dataset as stale.
    pub stale_hours: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl EngineConfig {
    /// Default file names under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            dataset_path: dir.join(DATASET_FILE),
            raw_path: dir.join(RAW_FILE),
            chart_path: dir.join(CHART_FILE),
            stale_hours: DEFAULT_STALE_HOURS,
        }
    }

    /// Resolve from process environment after loading `.env`, if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    ///
    /// Recognized keys: `SAMARTH_DATA_DIR`, `SAMARTH_DATASET`, `SAMARTH_RAW`,
    /// `SAMARTH_CHART`, `SAMARTH_STALE_HOURS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = match get("SAMARTH_DATA_DIR") {
            Some(dir) => Self::in_dir(dir),
            None => Self::default(),
        };

        if let Some(path) = get("SAMARTH_DATASET") {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = get("SAMARTH_RAW") {
            config.raw_path = PathBuf::from(path);
        }
        if let Some(path) = get("SAMARTH_CHART") {
            config.chart_path = PathBuf::from(path);
        }
        if let Some(raw) = get("SAMARTH_STALE_HOURS") {
            match raw.parse::<f64>() {
                Ok(h) if h.is_finite() && h > 0.0 => config.stale_hours = h,
                _ => warn!("Ignoring invalid SAMARTH_STALE_HOURS '{raw}'"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_under_data_dir() {
        let config = EngineConfig::from_lookup(|_| None);
        assert_eq!(config.dataset_path, PathBuf::from("data/mandi_clean.csv"));
        assert_eq!(config.raw_path, PathBuf::from("data/mandi_data.json"));
        assert_eq!(config.chart_path, PathBuf::from("data/trend.svg"));
        assert_eq!(config.stale_hours, 24.0);
    }

    #[test]
    fn data_dir_then_explicit_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SAMARTH_DATA_DIR", "/srv/mandi"),
            ("SAMARTH_CHART", "/tmp/req-42.svg"),
            ("SAMARTH_STALE_HOURS", "6"),
        ]));
        assert_eq!(config.dataset_path, PathBuf::from("/srv/mandi/mandi_clean.csv"));
        assert_eq!(config.chart_path, PathBuf::from("/tmp/req-42.svg"));
        assert_eq!(config.stale_hours, 6.0);
    }

    #[test]
    fn invalid_stale_hours_keeps_default() {
        let config = EngineConfig::from_lookup(lookup_from(&[("SAMARTH_STALE_HOURS", "soon")]));
        assert_eq!(config.stale_hours, DEFAULT_STALE_HOURS);
    }
}
