//! Configuration management for tradebook
//!
//! This module handles loading, validation, and management of
//! tradebook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Currency settings: the base currency and the static exchange-rate table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Base currency all converted amounts are normalized to
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Exchange rate per foreign currency code, against the base currency
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    /// Number of decimal places for display
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            rates: HashMap::new(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_base_currency() -> String {
    "LKR".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// One partition reference: a module/tab pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionRef {
    pub module: String,
    pub tab: String,
}

/// Federation settings: the sibling partitions merged into a mother view
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FederationConfig {
    /// Sibling partitions, in merge order
    #[serde(default)]
    pub registry: Vec<PartitionRef>,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for lists
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    50
}

/// Time range configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeRangeConfig {
    /// Default time range (e.g., "month", "quarter", "year")
    #[serde(default)]
    pub default_range: TimeRange,
}

/// Time range enumeration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Current month
    #[default]
    Month,
    /// Current quarter
    Quarter,
    /// Current year
    Year,
    /// All time
    All,
    /// Custom range
    Custom,
}

impl std::str::FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            "custom" => Ok(TimeRange::Custom),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Custom => write!(f, "custom"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Federation settings
    #[serde(default)]
    pub federation: FederationConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Time range settings
    #[serde(default)]
    pub time_range: TimeRangeConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.base_currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "currency.base_currency".to_string(),
            });
        }

        for (code, rate) in &self.currency.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("currency.rates.{}", code),
                    reason: "Exchange rate must be a positive number".to_string(),
                });
            }
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        for entry in &self.federation.registry {
            if entry.module.trim().is_empty() || entry.tab.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "federation.registry".to_string(),
                    reason: "Registry entries need a non-empty module and tab".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Check whether a federation registry is configured
    pub fn is_federated(&self) -> bool {
        !self.federation.registry.is_empty()
    }
}

// ==================== Tests ====================
