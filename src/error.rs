//! Error types for rusty_fx_analyzer

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for rusty_fx_analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid currency rate value: {rate} on {date}")]
    InvalidRate { date: NaiveDate, rate: f64 },

    #[error("Invalid range count: {0} (at least one range is required)")]
    InvalidRangeCount(usize),

    #[error("Invalid minimum range size: {0} (must be finite and positive)")]
    InvalidRangeSize(f64),

    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Selected period includes future: last allowed begin date is {latest}, got {begin}")]
    BeginDateInFuture { begin: NaiveDate, latest: NaiveDate },

    #[error("Selected period exceeds archived data: begin {begin} is before {earliest}")]
    BeginDateBeforeArchive { begin: NaiveDate, earliest: NaiveDate },

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for rusty_fx_analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
