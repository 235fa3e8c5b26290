//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a file with only some sections is
//! fine. A file that exists but does not parse is an error.

use crate::{
    core::metrics::DEFAULT_ADVISER_CAPACITY,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "AGENCY_DESK_CONFIG";

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Entity store behaviour
    pub store: StoreConfig,
    /// Dashboard metric parameters
    pub metrics: MetricsConfig,
}

/// Entity store settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Seed the sample advisers and policies when a collection has never been stored
    pub seed_sample_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
        }
    }
}

/// Parameters for the derived metrics shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Policies an adviser is expected to handle; 100% achievement at this count
    pub adviser_capacity: u32,
    /// Number of trailing months in the monthly performance series
    pub months_back: u32,
    /// Number of advisers in the top performers list
    pub top_advisers: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            adviser_capacity: DEFAULT_ADVISER_CAPACITY,
            months_back: 6,
            top_advisers: 3,
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `AGENCY_DESK_CONFIG` or `./config.toml`, falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {}", path);
        Ok(config)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r"
            [store]
            seed_sample_data = false

            [metrics]
            adviser_capacity = 25
            months_back = 12
            top_advisers = 5
        ";

        let config = parse_config(toml_str).unwrap();
        assert!(!config.store.seed_sample_data);
        assert_eq!(config.metrics.adviser_capacity, 25);
        assert_eq!(config.metrics.months_back, 12);
        assert_eq!(config.metrics.top_advisers, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config("[metrics]\nmonths_back = 3\n").unwrap();
        assert!(config.store.seed_sample_data);
        assert_eq!(config.metrics.adviser_capacity, 20);
        assert_eq!(config.metrics.months_back, 3);
        assert_eq!(config.metrics.top_advisers, 3);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let result = parse_config("[metrics]\nadviser_capacity = \"lots\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
