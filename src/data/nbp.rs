//! NBP web API payloads
//!
//! Decodes the JSON documents served by `https://api.nbp.pl/api`:
//!
//! - `/exchangerates/rates/{table}/{code}/{start}/{end}/`: one currency over a
//!   date range
//! - `/exchangerates/tables/{table}/`: the latest table (all currencies of
//!   table A or B on one day)
//!
//! Fetching is left to the caller; the path helpers only build the request
//! path for a given query.

use crate::currency::{Currency, CurrencyCode, TableType};
use crate::error::{AnalyzerError, Result};
use crate::types::{Observation, RateSeries};
use chrono::NaiveDate;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Public NBP API root
pub const NBP_API_BASE_URL: &str = "https://api.nbp.pl/api";

/// One rate of a single-currency query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NbpRate {
    pub no: String,
    pub effective_date: NaiveDate,
    pub mid: f64,
}

/// Response of a single-currency query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NbpRatesPayload {
    pub table: String,
    pub currency: String,
    pub code: String,
    pub rates: Vec<NbpRate>,
}

impl NbpRatesPayload {
    pub fn into_series(self) -> Result<RateSeries> {
        let code = CurrencyCode::new(&self.code)?;
        let observations = self
            .rates
            .into_iter()
            .map(|r| Observation::new(r.no, r.effective_date, r.mid))
            .collect();
        Ok(RateSeries::from_observations(code, observations))
    }
}

/// Currency row of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NbpTableEntry {
    pub currency: String,
    pub code: String,
    pub mid: f64,
}

/// One published table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NbpTable {
    pub table: String,
    pub no: String,
    pub effective_date: NaiveDate,
    pub rates: Vec<NbpTableEntry>,
}

/// Decode a single-currency rates document into a series
pub fn parse_rates_payload(json: &str) -> Result<RateSeries> {
    let payload: NbpRatesPayload = serde_json::from_str(json)?;
    log::debug!(
        "Decoded {} {} rates from table {}",
        payload.rates.len(),
        payload.code,
        payload.table
    );
    payload.into_series()
}

/// Decode a tables document (a JSON array of tables)
pub fn parse_tables(json: &str) -> Result<Vec<NbpTable>> {
    Ok(serde_json::from_str(json)?)
}

/// Currencies listed in `tables`, tagged with the table type they came from
///
/// Rows with malformed codes are skipped with a warning.
pub fn currencies_from_tables(tables: &[NbpTable], table_type: TableType) -> Vec<Currency> {
    tables
        .iter()
        .flat_map(|table| table.rates.iter())
        .filter_map(|entry| match CurrencyCode::new(&entry.code) {
            Ok(code) => Some(Currency {
                table: table_type,
                name: entry.currency.clone(),
                code,
            }),
            Err(e) => {
                log::warn!("Skipping table {} row '{}': {}", table_type, entry.code, e);
                None
            }
        })
        .collect()
}

/// Sorted, de-duplicated codes of tables A and B plus the reference currency
pub fn currency_codes(
    tables_a: &[NbpTable],
    tables_b: &[NbpTable],
    reference: &CurrencyCode,
) -> Vec<CurrencyCode> {
    let mut seen = HashSet::new();
    let mut codes: Vec<CurrencyCode> = currencies_from_tables(tables_a, TableType::A)
        .into_iter()
        .chain(currencies_from_tables(tables_b, TableType::B))
        .map(|currency| currency.code)
        .chain(std::iter::once(reference.clone()))
        .filter(|code| seen.insert(code.clone()))
        .collect();
    codes.sort();
    codes
}

/// Request path for one currency over an inclusive date range
pub fn rates_path(
    table: TableType,
    code: &CurrencyCode,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String> {
    if code.is_reference() {
        return Err(AnalyzerError::InvalidCurrency(format!(
            "{} is the reference currency and is not quoted by NBP",
            code
        )));
    }
    if start > end {
        return Err(AnalyzerError::InvalidDate(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    Ok(format!(
        "/exchangerates/rates/{}/{}/{}/{}/",
        table.as_str().to_ascii_lowercase(),
        code.as_str().to_ascii_lowercase(),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    ))
}

/// Request path for the latest table
pub fn tables_path(table: TableType) -> String {
    format!("/exchangerates/tables/{}/", table.as_str())
}

/// Join a base URL and a path, tolerating slashes on either side
pub fn build_url(base: &str, path: &str) -> Result<String> {
    let base = base.trim();
    if base.is_empty() {
        return Err(AnalyzerError::ConfigError(
            "NBP API base URL is not configured".to_string(),
        ));
    }
    let base = base.strip_suffix('/').unwrap_or(base);
    if path.starts_with('/') {
        Ok(format!("{}{}", base, path))
    } else {
        Ok(format!("{}/{}", base, path))
    }
}
