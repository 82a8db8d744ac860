//! Run configuration with documented defaults.
//!
//! Everything that would otherwise be a module-level constant — file paths,
//! the corporate-suffix list, window tolerances, endpoint settings — lives
//! here and is passed into the pipeline explicitly. TOML example:
//!
//! ```toml
//! company_list = "lists/nasdaq.csv"
//! output_path = "results/output.csv"
//! as_of = "2024-06-01"
//!
//! [window]
//! span_days = 3
//! required_observations = 3
//! max_shifts = 10
//!
//! [prices]
//! api_key = "demo"
//! ```

use crate::prices::PriceConfig;
use crate::registry::RegistryConfig;
use crate::resolver::WindowParams;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Complete configuration for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    /// CSV of listed companies (name in column 1, ticker in column 2).
    pub company_list: PathBuf,
    /// Report destination; parent directories are created on write.
    pub output_path: PathBuf,
    /// Trailing name tokens stripped before querying the registry.
    pub corporate_suffixes: Vec<String>,
    /// Window search tolerances.
    pub window: WindowParams,
    /// Cutoff for "already started" trials. None means the run date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Registry endpoint settings.
    pub registry: RegistryConfig,
    /// Price provider settings.
    pub prices: PriceConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            company_list: PathBuf::from("lists/nasdaq.csv"),
            output_path: PathBuf::from("results/output.csv"),
            corporate_suffixes: default_corporate_suffixes(),
            window: WindowParams::default(),
            as_of: None,
            registry: RegistryConfig::default(),
            prices: PriceConfig::default(),
        }
    }
}

impl BacktestConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The effective "today" for the started-trial cutoff.
    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// The default corporate-suffix set, matched case-insensitively against
/// trailing name tokens.
pub fn default_corporate_suffixes() -> Vec<String> {
    [
        "inc.",
        "ltd.",
        "corp.",
        "co.",
        "incorporated",
        "limited",
        "corporation",
        "holding",
        "holdings",
        "group",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = BacktestConfig::from_toml(r#"company_list = "lists/test_list.csv""#).unwrap();

        assert_eq!(config.company_list, PathBuf::from("lists/test_list.csv"));
        assert_eq!(config.output_path, PathBuf::from("results/output.csv"));
        assert_eq!(config.window.max_shifts, 10);
        assert!(config.corporate_suffixes.contains(&"inc.".to_string()));
    }

    #[test]
    fn nested_sections_parse() {
        let config = BacktestConfig::from_toml(
            r#"
            as_of = "2024-06-01"

            [window]
            span_days = 5
            required_observations = 4
            max_shifts = 2

            [prices]
            api_key = "demo"
            "#,
        )
        .unwrap();

        assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(config.window.span_days, 5);
        assert_eq!(config.prices.api_key.as_deref(), Some("demo"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(BacktestConfig::from_toml(r#"not_a_field = 1"#).is_err());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let config = BacktestConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed = BacktestConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed.window, config.window);
        assert_eq!(parsed.company_list, config.company_list);
    }
}
