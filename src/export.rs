//! Export of the calculated results to a JSON file
//! `calculator-results-<unix time in ms>.json`:
//! ```json
//! { "timestamp": "2024-05-01T12:00:00.000Z", "results": [ ... ] }
//! ```
use crate::Concentration::calc_error::{CalcError, CalcResult};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData<T> {
    /// ISO-8601, UTC
    pub timestamp: String,
    pub results: Vec<T>,
}

impl<T: Serialize> ExportData<T> {
    pub fn new(results: Vec<T>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            results,
        }
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("calculator-results-{}.json", now.timestamp_millis())
}

/// Writes `results` into `dir` and returns the path of the new file.
/// Fails with `NothingToExport` when there is nothing to write.
pub fn export_results<T: Serialize + Clone>(results: &[T], dir: &Path) -> CalcResult<PathBuf> {
    if results.is_empty() {
        return Err(CalcError::NothingToExport);
    }
    let now = Utc::now();
    let data = ExportData::new(results.to_vec(), now);
    let path = dir.join(export_file_name(now));
    fs::write(&path, data.to_json()?)?;
    info!("{} results exported to {}", results.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;
    use tempfile::tempdir;

    #[derive(Debug, Clone, Serialize)]
    struct Row {
        id: &'static str,
        mass: f64,
    }

    #[test]
    fn test_export_data_format() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let data = ExportData::new(vec![Row { id: "iptg", mass: 0.11915 }], now);
        assert_eq!(data.timestamp, "2024-05-01T12:00:00.000Z");
        let json: Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(json["results"][0]["id"], "iptg");
        assert_eq!(json["results"][0]["mass"], 0.11915);
        assert_eq!(
            export_file_name(now),
            format!("calculator-results-{}.json", now.timestamp_millis())
        );
    }

    #[test]
    fn test_export_to_dir() {
        let dir = tempdir().unwrap();
        let rows = vec![Row { id: "a", mass: 1.0 }, Row { id: "b", mass: 2.0 }];
        let path = export_results(&rows, dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 2);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_nothing_to_export() {
        let dir = tempdir().unwrap();
        let rows: Vec<Row> = Vec::new();
        assert!(matches!(
            export_results(&rows, dir.path()),
            Err(CalcError::NothingToExport)
        ));
    }
}
