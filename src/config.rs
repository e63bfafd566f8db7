//! Runtime configuration
//!
//! Values come from `NDB_*` environment variables; the CLI may override them.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::{NdbClient, NdbError, DEFAULT_REPORT_URL, DEFAULT_SEARCH_URL};
use crate::units::{DefinitionResult, UnitRegistry};

/// Default location of the food unit definitions, relative to the working directory
pub const DEFAULT_UNITS_PATH: &str = "./data/food_units.txt";

pub const ENV_API_KEY: &str = "NDB_API_KEY";
pub const ENV_SEARCH_URL: &str = "NDB_SEARCH_URL";
pub const ENV_REPORT_URL: &str = "NDB_REPORT_URL";
pub const ENV_UNITS_PATH: &str = "NDB_UNITS_PATH";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key configured; set NDB_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] NdbError),
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub search_url: String,
    pub report_url: String,
    pub units_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            report_url: DEFAULT_REPORT_URL.to_string(),
            units_path: PathBuf::from(DEFAULT_UNITS_PATH),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: get(ENV_API_KEY),
            search_url: get(ENV_SEARCH_URL).unwrap_or(defaults.search_url),
            report_url: get(ENV_REPORT_URL).unwrap_or(defaults.report_url),
            units_path: get(ENV_UNITS_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.units_path),
        }
    }

    pub fn api_key(&self) -> ConfigResult<&str> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Build a client for the configured key and endpoints
    pub fn client(&self) -> ConfigResult<NdbClient> {
        let client = NdbClient::new(self.api_key()?)?
            .with_search_url(&self.search_url)
            .with_report_url(&self.report_url);
        Ok(client)
    }

    /// Load the unit registry from the configured definitions file
    pub fn unit_registry(&self) -> DefinitionResult<UnitRegistry> {
        UnitRegistry::from_file(&self.units_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
        assert!(matches!(config.client(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_API_KEY, "abc123"),
            (ENV_SEARCH_URL, "http://localhost:9000/search"),
            (ENV_UNITS_PATH, "/etc/ndb/units.txt"),
        ]));

        assert_eq!(config.api_key().unwrap(), "abc123");
        assert_eq!(config.search_url, "http://localhost:9000/search");
        assert_eq!(config.report_url, DEFAULT_REPORT_URL);
        assert_eq!(config.units_path, PathBuf::from("/etc/ndb/units.txt"));

        let client = config.client().unwrap();
        assert_eq!(client.search_url(), "http://localhost:9000/search");
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config = Config::from_lookup(lookup_from(&[(ENV_API_KEY, "  ")]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_unit_registry_from_shipped_file() {
        let config = Config {
            units_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data/food_units.txt")),
            ..Config::default()
        };
        let registry = config.unit_registry().unwrap();
        assert!(registry.contains("µg"));
    }

    #[test]
    fn test_unit_registry_missing_file_fails() {
        let config = Config {
            units_path: PathBuf::from("/nonexistent/food_units.txt"),
            ..Config::default()
        };
        assert!(config.unit_registry().is_err());
    }
}
