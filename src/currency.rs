//! Currency codes, NBP table types and currency pairs

use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code of the currency every NBP mid rate is quoted against
pub const REFERENCE_CURRENCY: &str = "PLN";

/// ISO 4217 currency code (three ASCII letters, stored uppercase)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(pub(crate) String);

impl CurrencyCode {
    /// Parse and normalize a currency code
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AnalyzerError::InvalidCurrency(format!(
                "expected a three-letter code, got '{}'",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The reference (domestic) currency
    pub fn reference() -> Self {
        Self(REFERENCE_CURRENCY.to_string())
    }

    /// Get currency code as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reference currency, whose rate is 1.0 by definition
    pub fn is_reference(&self) -> bool {
        self.0 == REFERENCE_CURRENCY
    }
}

impl FromStr for CurrencyCode {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = AnalyzerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NBP exchange-rate table
///
/// Table A lists the major currencies and is published every business day,
/// table B lists the remaining ones and is published weekly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    A,
    B,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::A => "A",
            TableType::B => "B",
        }
    }
}

impl FromStr for TableType {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(TableType::A),
            "B" => Ok(TableType::B),
            other => Err(AnalyzerError::InvalidData(format!(
                "Unknown NBP table type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currency listed in one of the NBP tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub table: TableType,
    pub name: String,
    pub code: CurrencyCode,
}

/// Currency pair for cross rates
///
/// The cross rate of a pair is `base / quote`, both quoted against the
/// reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    /// Create new currency pair
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Parse from string (e.g., "EUR/USD" or "EURUSD")
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((base, quote)) = s.split_once('/') {
            Ok(Self::new(CurrencyCode::new(base)?, CurrencyCode::new(quote)?))
        } else if s.len() == 6 && s.is_ascii() {
            Ok(Self::new(
                CurrencyCode::new(&s[0..3])?,
                CurrencyCode::new(&s[3..6])?,
            ))
        } else {
            Err(AnalyzerError::InvalidCurrency(format!(
                "Invalid currency pair format: {}",
                s
            )))
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
