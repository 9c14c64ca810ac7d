//! # Settings Module
//!
//! ## Purpose
//! Keeps the user configuration of Science Hub in one JSON file
//! (`science_hub_config.json` in the working directory by default): which periodic
//! table to use for atomic masses, how many decimal places reports show and where the
//! session log goes.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "periodic_table": "databases/PeriodicTableJSON.json",
//!   "precision": 4,
//!   "log_file": "logs/science_hub.log",
//!   "log_level": "info",
//!   "clear_log_on_startup": false
//! }
//! ```
//! Missing keys take their default values; without a `periodic_table` the built-in table is used.
//!
//! ## Usage Pattern
//! ```rust,no_run
//! use science_hub::settings::ConfigManager;
//!
//! let mut manager = ConfigManager::new();
//! manager.set_precision(6).unwrap();
//! let table = manager.periodic_table().unwrap();
//! ```
//!
//! The manager is an ordinary value: whoever needs the configuration gets it by reference.
use crate::Chemistry::periodic_table::{PeriodicTable, PeriodicTableError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "science_hub_config.json";
pub const MAX_PRECISION: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File does not exist: {0}")]
    MissingFile(String),
    #[error(transparent)]
    PeriodicTable(#[from] PeriodicTableError),
    #[error("Precision {0} is out of range, at most 10 decimal places")]
    InvalidPrecision(usize),
}

/// User configuration
///
/// # Fields
/// * `periodic_table` - path to a PeriodicTableJSON file, built-in table when `None`
/// * `precision` - decimal places in mass reports
/// * `log_file` - session log, appended to
/// * `log_level` - `off`, `error`, `warn`, `info`, `debug` or `trace`
/// * `clear_log_on_startup` - truncate the session log when the program starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub periodic_table: Option<String>,
    pub precision: usize,
    pub log_file: String,
    pub log_level: String,
    pub clear_log_on_startup: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            periodic_table: None,
            precision: 4,
            log_file: "logs/science_hub.log".to_string(),
            log_level: "info".to_string(),
            clear_log_on_startup: false,
        }
    }
}

/// Loads, validates and saves [`HubConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: HubConfig,
    config_file: String,
}

impl ConfigManager {
    /// Reads [`DEFAULT_CONFIG_FILE`]; a missing or broken file gives the default configuration.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Same as [`ConfigManager::new`] with a custom configuration file
    pub fn with_config_file(config_file: &str) -> Self {
        Self::load(config_file).0
    }

    /// Reads `config_file`. When the file exists but cannot be used, the manager holds the
    /// defaults and the reason is returned next to it, so that it can be reported once
    /// logging is set up. Saving from such a manager overwrites the broken file.
    pub fn load(config_file: &str) -> (Self, Option<ConfigError>) {
        let (config, error) = match Self::load_config(config_file) {
            Ok(config) => (config, None),
            Err(e) => {
                warn!(
                    "Configuration '{}' not usable ({}), using defaults",
                    config_file, e
                );
                (HubConfig::default(), Some(e))
            }
        };
        let manager = Self {
            config,
            config_file: config_file.to_string(),
        };
        (manager, error)
    }

    /// Parses the configuration file, or returns the defaults when it does not exist
    pub fn load_config(config_file: &str) -> Result<HubConfig, ConfigError> {
        if !Path::new(config_file).exists() {
            return Ok(HubConfig::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: HubConfig = serde_json::from_str(&content)?;
        if config.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(config.precision));
        }
        Ok(config)
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("Configuration saved to '{}'", self.config_file);
        Ok(())
    }

    pub fn get_config(&self) -> &HubConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Switches to another periodic table file. The file must exist and parse.
    pub fn set_periodic_table(&mut self, path: &str) -> Result<(), ConfigError> {
        if !Path::new(path).exists() {
            return Err(ConfigError::MissingFile(path.to_string()));
        }
        PeriodicTable::load(path)?;
        self.config.periodic_table = Some(path.to_string());
        self.save_config()
    }

    /// Goes back to the built-in periodic table
    pub fn use_builtin_periodic_table(&mut self) -> Result<(), ConfigError> {
        self.config.periodic_table = None;
        self.save_config()
    }

    pub fn set_precision(&mut self, precision: usize) -> Result<(), ConfigError> {
        if precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(precision));
        }
        self.config.precision = precision;
        self.save_config()
    }

    pub fn set_clear_log_on_startup(&mut self, clear: bool) -> Result<(), ConfigError> {
        self.config.clear_log_on_startup = clear;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.config = HubConfig::default();
        self.save_config()
    }

    /// The periodic table the configuration points at
    pub fn periodic_table(&self) -> Result<PeriodicTable, PeriodicTableError> {
        match &self.config.periodic_table {
            Some(path) => PeriodicTable::load(path),
            None => Ok(PeriodicTable::builtin()),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_manager(dir: &TempDir) -> ConfigManager {
        let path = dir.path().join("config.json");
        ConfigManager::with_config_file(path.to_str().unwrap())
    }

    fn create_table_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"elements": [{"name": "Iron", "symbol": "Fe", "number": 26, "atomic_mass": 55.85}]}"#,
        )
        .unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = create_test_manager(&dir);
        assert_eq!(manager.get_config(), &HubConfig::default());
        assert_eq!(manager.periodic_table().unwrap().len(), 118);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"precision": 2}"#).unwrap();
        let manager = ConfigManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.get_config().precision, 2);
        assert_eq!(manager.get_config().log_level, "info");
        assert_eq!(manager.get_config().periodic_table, None);
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            ConfigManager::load_config(file.path().to_str().unwrap()),
            Err(ConfigError::Json(_))
        ));
        let manager = ConfigManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.get_config(), &HubConfig::default());
    }

    #[test]
    fn test_load_reports_broken_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let (manager, error) = ConfigManager::load(file.path().to_str().unwrap());
        assert!(matches!(error, Some(ConfigError::Json(_))));
        assert_eq!(manager.get_config(), &HubConfig::default());

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("config.json");
        let (_, error) = ConfigManager::load(missing.to_str().unwrap());
        assert!(error.is_none());
    }

    #[test]
    fn test_precision_from_file_is_validated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"precision": 50}"#).unwrap();
        assert!(matches!(
            ConfigManager::load_config(file.path().to_str().unwrap()),
            Err(ConfigError::InvalidPrecision(50))
        ));
        let (manager, error) = ConfigManager::load(file.path().to_str().unwrap());
        assert!(matches!(error, Some(ConfigError::InvalidPrecision(50))));
        assert_eq!(manager.get_config().precision, 4);
    }

    #[test]
    fn test_setters_persist() {
        let dir = TempDir::new().unwrap();
        let table_file = create_table_file();
        let table_path = table_file.path().to_str().unwrap();

        let mut manager = create_test_manager(&dir);
        manager.set_precision(6).unwrap();
        manager.set_periodic_table(table_path).unwrap();
        manager.set_clear_log_on_startup(true).unwrap();

        let reloaded = ConfigManager::with_config_file(manager.config_file());
        assert_eq!(reloaded.get_config().precision, 6);
        assert_eq!(
            reloaded.get_config().periodic_table.as_deref(),
            Some(table_path)
        );
        assert!(reloaded.get_config().clear_log_on_startup);
        let table = reloaded.periodic_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Fe").unwrap().name, "Iron");
    }

    #[test]
    fn test_invalid_updates_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut manager = create_test_manager(&dir);
        assert!(matches!(
            manager.set_precision(MAX_PRECISION + 1),
            Err(ConfigError::InvalidPrecision(_))
        ));
        assert!(matches!(
            manager.set_periodic_table("no/such/table.json"),
            Err(ConfigError::MissingFile(_))
        ));
        let mut empty_table = NamedTempFile::new().unwrap();
        empty_table.write_all(b"[]").unwrap();
        assert!(matches!(
            manager.set_periodic_table(empty_table.path().to_str().unwrap()),
            Err(ConfigError::PeriodicTable(PeriodicTableError::Empty))
        ));
        assert_eq!(manager.get_config(), &HubConfig::default());
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = TempDir::new().unwrap();
        let table_file = create_table_file();
        let mut manager = create_test_manager(&dir);
        manager
            .set_periodic_table(table_file.path().to_str().unwrap())
            .unwrap();
        manager.use_builtin_periodic_table().unwrap();
        assert_eq!(manager.get_config().periodic_table, None);
        manager.set_precision(1).unwrap();
        manager.reset_to_defaults().unwrap();
        assert_eq!(manager.get_config(), &HubConfig::default());
        let reloaded = ConfigManager::with_config_file(manager.config_file());
        assert_eq!(reloaded.get_config().precision, 4);
    }
}
