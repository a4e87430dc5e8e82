//! CSV observation files
//!
//! Expected format (header required, `#` lines are comments):
//!
//! ```text
//! date,rate,no
//! 2025-01-02,4.1219,001/A/NBP/2025
//! 2025-01-03,4.1512,002/A/NBP/2025
//! ```
//!
//! `effectiveDate` and `mid` are accepted as column names too, and `no` is
//! optional; rows without it are numbered from 1.

use crate::currency::CurrencyCode;
use crate::error::Result;
use crate::types::{Observation, RateSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "effectiveDate")]
    date: NaiveDate,
    #[serde(alias = "mid")]
    rate: f64,
    #[serde(default)]
    no: Option<String>,
}

/// Read observations of `currency` from any CSV reader
pub fn read_series<R: Read>(currency: CurrencyCode, reader: R) -> Result<RateSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series = RateSeries::new(currency);
    for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let sequence_id = row.no.unwrap_or_else(|| format!("{}", i + 1));
        series.push(Observation::new(sequence_id, row.date, row.rate));
    }

    log::debug!("Read {} {} rates from CSV", series.len(), series.currency);
    Ok(series)
}

/// Read observations from a CSV string
pub fn parse_csv(currency: CurrencyCode, csv_data: &str) -> Result<RateSeries> {
    read_series(currency, csv_data.as_bytes())
}

/// Read observations from a CSV file
pub fn load_csv_file(currency: CurrencyCode, path: &Path) -> Result<RateSeries> {
    let file = std::fs::File::open(path)?;
    read_series(currency, file)
}
