//! data.gov.in Agmarknet integration: daily mandi prices.

use std::path::Path;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::io::export::write_atomic;

/// Current daily prices of commodities across mandis.
pub const DEFAULT_RESOURCE_URL: &str = "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";
pub const DEFAULT_PAGE_LIMIT: usize = 5000;
pub const DEFAULT_MAX_RECORDS: usize = 10000;

pub struct AgmarknetClient {
    client: Client,
    api_key: String,
    resource_url: String,
}

impl AgmarknetClient {
    pub fn new(api_key: impl Into<String>, resource_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            resource_url: resource_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("DATA_GOV_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::new(2, "Missing DATA_GOV_API_KEY in environment (.env)."))?;
        let resource_url =
            std::env::var("DATA_GOV_RESOURCE_URL").unwrap_or_else(|_| DEFAULT_RESOURCE_URL.to_string());
        Ok(Self::new(api_key, resource_url))
    }

    /// Fetch up to `max_records` rows in pages of `limit`.
    pub fn fetch_records(&self, limit: usize, max_records: usize) -> Result<Vec<Value>, AppError> {
        paginate(limit, max_records, |offset| self.fetch_page(limit, offset))
    }

    fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Value>, AppError> {
        let resp = self
            .client
            .get(&self.resource_url)
            .query(&[
                ("api-key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", &limit.to_string()),
                ("offset", &offset.to_string()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Agmarknet request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Agmarknet request failed with status {}.", resp.status()),
            ));
        }

        let body: RecordsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse Agmarknet response: {e}")))?;
        Ok(body.records)
    }
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Value>,
}

/// Request pages at offsets `0, limit, 2*limit, ...` below `max_records`.
///
/// An empty page ends pagination early. Any page failure aborts the whole fetch.
pub fn paginate(
    limit: usize,
    max_records: usize,
    mut fetch_page: impl FnMut(usize) -> Result<Vec<Value>, AppError>,
) -> Result<Vec<Value>, AppError> {
    if limit == 0 {
        return Err(AppError::new(2, "Page limit must be > 0."));
    }

    let mut all = Vec::new();
    let mut offset = 0usize;
    while offset < max_records {
        let page = fetch_page(offset)?;
        if page.is_empty() {
            break;
        }
        let n = page.len();
        all.extend(page);
        offset += limit;
        info!("Fetched {n} records (offset={offset})");
    }
    Ok(all)
}

/// Save the raw snapshot as pretty JSON, replacing any previous one.
pub fn write_snapshot(path: &Path, records: &[Value]) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(records)
        .map_err(|e| AppError::new(2, format!("Failed to serialize snapshot: {e}")))?;
    write_atomic(path, &bytes)?;
    info!("Saved {} mandi records -> {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "market": format!("M{i}") })).collect()
    }

    #[test]
    fn paginates_until_max_records() {
        let mut offsets = Vec::new();
        let all = paginate(2, 5, |offset| {
            offsets.push(offset);
            Ok(page(2))
        })
        .unwrap();
        assert_eq!(offsets, vec![0, 2, 4]);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn empty_page_stops_early() {
        let mut calls = 0;
        let all = paginate(5000, 10000, |offset| {
            calls += 1;
            Ok(if offset == 0 { page(3) } else { Vec::new() })
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn page_failure_aborts() {
        let err = paginate(1, 10, |offset| {
            if offset < 2 {
                Ok(page(1))
            } else {
                Err(AppError::new(4, "status 503"))
            }
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(paginate(0, 10, |_| Ok(page(1))).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn response_without_records_is_empty() {
        let body: RecordsResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(body.records.is_empty());
    }

    #[test]
    fn snapshot_round_trips_as_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mandi_data.json");
        write_snapshot(&path, &page(2)).unwrap();
        let back: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, page(2));
    }
}
