//! # Settings Module
//!
//! ## Purpose
//! Keeps the user-adjustable parameters of the calculator in a JSON file
//! (`molprep_config.json` by default): where to find the substance catalogue,
//! the acceptable weighing error, decimal places of the reports, export directory
//! and logging.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "substance_catalogue": "substances.json",
//!   "acceptable_error_percent": 10.0,
//!   "mass_decimals": 4,
//!   "concentration_decimals": 6,
//!   "percent_decimals": 2,
//!   "export_dir": ".",
//!   "log_level": "info",
//!   "log_file": null
//! }
//! ```
//! Every field may be omitted, the default is used instead.
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use molprep::settings::SettingsManager;
//!
//! let mut manager = SettingsManager::new()?;
//! manager.set_acceptable_error_percent(5.0)?;
//! ```

use crate::Concentration::calc_error::{CalcError, CalcResult};
use crate::Concentration::calculator::Precision;
use crate::Concentration::formulas::DEFAULT_ACCEPTABLE_ERROR_PERCENT;
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "molprep_config.json";

/// Parameters stored in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON file with substances; the built-in list is used when not set
    pub substance_catalogue: Option<PathBuf>,
    /// tolerance of the weighing, %
    pub acceptable_error_percent: f64,
    pub mass_decimals: usize,
    pub concentration_decimals: usize,
    pub percent_decimals: usize,
    /// where exported results are written
    pub export_dir: PathBuf,
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    /// log is also written to this file when set
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let precision = Precision::default();
        Self {
            substance_catalogue: None,
            acceptable_error_percent: DEFAULT_ACCEPTABLE_ERROR_PERCENT,
            mass_decimals: precision.mass_decimals,
            concentration_decimals: precision.concentration_decimals,
            percent_decimals: precision.percent_decimals,
            export_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    pub fn precision(&self) -> Precision {
        Precision {
            mass_decimals: self.mass_decimals,
            concentration_decimals: self.concentration_decimals,
            percent_decimals: self.percent_decimals,
        }
    }

    pub fn level_filter(&self) -> CalcResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| CalcError::invalid(format!("unknown log level: {}", self.log_level)))
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.acceptable_error_percent.is_finite() || self.acceptable_error_percent < 0.0 {
            return Err(CalcError::invalid(format!(
                "acceptable error must be a non-negative number, got {}",
                self.acceptable_error_percent
            )));
        }
        self.level_filter()?;
        Ok(())
    }
}

/// Owner of the settings and of the file they are stored in.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: Settings,
    config_file: PathBuf,
}

impl SettingsManager {
    /// Loads `molprep_config.json` from the current directory, defaults if there is no such file.
    pub fn new() -> CalcResult<Self> {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Loads the given file. A missing file gives the defaults, a broken one is an error.
    pub fn with_config_file(config_file: impl AsRef<Path>) -> CalcResult<Self> {
        let config_file = config_file.as_ref().to_path_buf();
        let settings = Self::load_config(&config_file)?;
        Ok(Self {
            settings,
            config_file,
        })
    }

    fn load_config(config_file: &Path) -> CalcResult<Settings> {
        if config_file.exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: Settings = serde_json::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Writes the current settings to the config file as pretty JSON.
    pub fn save_config(&self) -> CalcResult<()> {
        let content = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.config_file, content)?;
        info!("settings saved to {}", self.config_file.display());
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Sets the substance catalogue file; the file must exist.
    pub fn set_substance_catalogue(&mut self, path: &str) -> CalcResult<()> {
        if !Path::new(path).exists() {
            return Err(CalcError::invalid(format!("File does not exist: {}", path)));
        }
        self.settings.substance_catalogue = Some(PathBuf::from(path));
        self.save_config()
    }

    pub fn set_acceptable_error_percent(&mut self, value: f64) -> CalcResult<()> {
        let mut updated = self.settings.clone();
        updated.acceptable_error_percent = value;
        updated.validate()?;
        self.settings = updated;
        self.save_config()
    }

    pub fn set_export_dir(&mut self, path: &str) -> CalcResult<()> {
        if !Path::new(path).is_dir() {
            return Err(CalcError::invalid(format!("Not a directory: {}", path)));
        }
        self.settings.export_dir = PathBuf::from(path);
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> CalcResult<()> {
        self.settings = Settings::default();
        self.save_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::with_config_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(manager.settings(), &Settings::default());
        assert_eq!(manager.settings().acceptable_error_percent, 10.0);
        assert_eq!(manager.settings().precision(), Precision::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"acceptable_error_percent": 5.0, "mass_decimals": 6}"#)
            .unwrap();
        let manager = SettingsManager::with_config_file(file.path()).unwrap();
        let settings = manager.settings();
        assert_eq!(settings.acceptable_error_percent, 5.0);
        assert_eq!(settings.mass_decimals, 6);
        assert_eq!(settings.concentration_decimals, 6);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"acceptable_error_percent": -1.0}"#).unwrap();
        assert!(SettingsManager::with_config_file(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"log_level": "loud"}"#).unwrap();
        assert!(SettingsManager::with_config_file(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            SettingsManager::with_config_file(file.path()),
            Err(CalcError::Json(_))
        ));
    }

    #[test]
    fn test_update_and_save() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        let mut manager = SettingsManager::with_config_file(&config).unwrap();

        manager.set_acceptable_error_percent(2.5).unwrap();
        assert!(manager.set_acceptable_error_percent(-3.0).is_err());
        assert_eq!(manager.settings().acceptable_error_percent, 2.5);
        assert!(manager.set_substance_catalogue("no_such_file.json").is_err());
        manager
            .set_export_dir(dir.path().to_str().unwrap())
            .unwrap();

        let reloaded = SettingsManager::with_config_file(&config).unwrap();
        assert_eq!(reloaded.settings().acceptable_error_percent, 2.5);
        assert_eq!(reloaded.settings().export_dir, dir.path());

        manager.reset_to_defaults().unwrap();
        let reloaded = SettingsManager::with_config_file(&config).unwrap();
        assert_eq!(reloaded.settings(), &Settings::default());
    }
}
