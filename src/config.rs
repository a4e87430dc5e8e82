//! Analyzer configuration
//!
//! Read from TOML; every key is optional:
//!
//! ```toml
//! data_dir = "/var/lib/rusty-fx"
//! default_currency = "USD"
//! default_period = "MONTH"
//! reference_currency = "PLN"
//! min_allowed_date = "2002-01-02"
//! nbp_api_base_url = "https://api.nbp.pl/api"
//!
//! [distribution]
//! desired_ranges = 14
//! min_range_size = 0.0001
//! mode = "changes"
//! ```

use crate::analysis::distribution::DistributionOptions;
use crate::currency::CurrencyCode;
use crate::data::nbp::NBP_API_BASE_URL;
use crate::error::{AnalyzerError, Result};
use crate::period::{parse_date, Period};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the earliest allowed begin date
pub const ENV_MIN_ALLOWED_DATE: &str = "RUSTY_FX_MIN_ALLOWED_DATE";
/// Overrides the data directory
pub const ENV_DATA_DIR: &str = "RUSTY_FX_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_currency")]
    pub default_currency: CurrencyCode,
    #[serde(default = "default_period")]
    pub default_period: Period,
    #[serde(default = "CurrencyCode::reference")]
    pub reference_currency: CurrencyCode,
    /// First day of the NBP archive
    #[serde(default = "default_min_allowed_date")]
    pub min_allowed_date: NaiveDate,
    #[serde(default = "default_api_base_url")]
    pub nbp_api_base_url: String,
    #[serde(default)]
    pub distribution: DistributionOptions,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_currency() -> CurrencyCode {
    CurrencyCode("USD".to_string())
}

fn default_period() -> Period {
    Period::Month
}

fn default_min_allowed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2002, 1, 2).unwrap_or_default()
}

fn default_api_base_url() -> String {
    NBP_API_BASE_URL.to_string()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_currency: default_currency(),
            default_period: default_period(),
            reference_currency: CurrencyCode::reference(),
            min_allowed_date: default_min_allowed_date(),
            nbp_api_base_url: default_api_base_url(),
            distribution: DistributionOptions::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MIN_ALLOWED_DATE) {
            self.min_allowed_date = parse_date(&value)?;
            log::debug!("{} overrides min_allowed_date: {}", ENV_MIN_ALLOWED_DATE, value);
        }
        if let Some(value) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(value);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.distribution
            .validate()
            .map_err(|e| AnalyzerError::ConfigError(format!("distribution: {}", e)))?;
        if self.nbp_api_base_url.trim().is_empty() {
            return Err(AnalyzerError::ConfigError(
                "nbp_api_base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
