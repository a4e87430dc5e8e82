//! In-memory rate source
//!
//! Keeps rates per currency in a `BTreeMap` keyed by date, so a window query
//! is a range scan. Useful for tests and for analysing files downloaded
//! beforehand.

use super::csv_loader;
use super::nbp;
use super::source::{reference_series_of, RateSource};
use crate::currency::CurrencyCode;
use crate::error::{AnalyzerError, Result};
use crate::types::{Observation, Rate, RateSeries};
use chrono::NaiveDate;
use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
struct StoredRate {
    sequence_id: String,
    rate: Rate,
}

/// In-memory rate storage
///
/// # Example
/// ```
/// use rusty_fx_analyzer::currency::CurrencyCode;
/// use rusty_fx_analyzer::data::{InMemoryRateSource, RateSource};
/// use chrono::NaiveDate;
///
/// let mut source = InMemoryRateSource::new();
/// let usd = CurrencyCode::new("USD").unwrap();
/// let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
///
/// source.add_rate(&usd, day, "001/A/NBP/2025", 4.1219).unwrap();
///
/// let series = source.series(&usd, day, day).unwrap();
/// assert_eq!(series.observations[0].rate, 4.1219);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryRateSource {
    rates: HashMap<CurrencyCode, BTreeMap<NaiveDate, StoredRate>>,
    reference: CurrencyCode,
}

impl Default for InMemoryRateSource {
    fn default() -> Self {
        Self {
            rates: HashMap::new(),
            reference: CurrencyCode::reference(),
        }
    }
}

impl InMemoryRateSource {
    /// Create new in-memory rate source quoting against PLN
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source whose rates are quoted against `reference`
    ///
    /// Requests for `reference` itself are answered with a constant 1.0
    /// series unless rates for it were loaded explicitly.
    pub fn with_reference(reference: CurrencyCode) -> Self {
        Self {
            rates: HashMap::new(),
            reference,
        }
    }

    pub fn reference_currency(&self) -> &CurrencyCode {
        &self.reference
    }

    /// Add a single rate, replacing any rate already stored for that date
    pub fn add_rate(
        &mut self,
        code: &CurrencyCode,
        date: NaiveDate,
        sequence_id: &str,
        rate: Rate,
    ) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AnalyzerError::InvalidData(format!(
                "{} rate must be positive, got {} on {}",
                code, rate, date
            )));
        }

        self.rates.entry(code.clone()).or_default().insert(
            date,
            StoredRate {
                sequence_id: sequence_id.to_string(),
                rate,
            },
        );
        Ok(())
    }

    /// Add every observation of a series
    ///
    /// Nothing is stored if any observation is rejected.
    pub fn add_series(&mut self, series: &RateSeries) -> Result<usize> {
        if let Some(bad) = series
            .iter()
            .find(|o| !o.rate.is_finite() || o.rate <= 0.0)
        {
            return Err(AnalyzerError::InvalidData(format!(
                "{} rate must be positive, got {} on {}",
                series.currency, bad.rate, bad.date
            )));
        }

        for observation in series {
            self.add_rate(
                &series.currency,
                observation.date,
                &observation.sequence_id,
                observation.rate,
            )?;
        }
        log::info!("Loaded {} {} rates", series.len(), series.currency);
        Ok(series.len())
    }

    /// Load a single-currency NBP rates document
    pub fn load_nbp_json(&mut self, json: &str) -> Result<usize> {
        let series = nbp::parse_rates_payload(json)?;
        self.add_series(&series)
    }

    /// Load CSV observations of `code`
    pub fn load_csv(&mut self, code: &CurrencyCode, csv_data: &str) -> Result<usize> {
        let series = csv_loader::parse_csv(code.clone(), csv_data)?;
        self.add_series(&series)
    }

    /// Load a `.json` NBP document or a `.csv` observation file
    ///
    /// CSV files carry no currency code; it is taken from `code` or, failing
    /// that, from the file stem (`usd.csv` holds USD).
    pub fn load_path(&mut self, path: &Path, code: Option<&CurrencyCode>) -> Result<usize> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => {
                let json = std::fs::read_to_string(path)?;
                self.load_nbp_json(&json)
            }
            Some("csv") => {
                let code = match code {
                    Some(code) => code.clone(),
                    None => path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .ok_or_else(|| {
                            AnalyzerError::InvalidCurrency(format!(
                                "cannot infer currency from {}",
                                path.display()
                            ))
                        })
                        .and_then(CurrencyCode::new)?,
                };
                let series = csv_loader::load_csv_file(code, path)?;
                self.add_series(&series)
            }
            _ => Err(AnalyzerError::InvalidData(format!(
                "Unsupported rate file (expected .json or .csv): {}",
                path.display()
            ))),
        }
    }

    /// Load every `.json` and `.csv` file of a directory
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("json") | Some("csv")
                )
            })
            .collect();
        paths.sort();

        let mut total = 0;
        for path in paths {
            total += self.load_path(&path, None)?;
        }
        Ok(total)
    }

    /// Clear all rates
    pub fn clear(&mut self) {
        self.rates.clear();
    }

    /// Get number of stored currencies
    pub fn num_currencies(&self) -> usize {
        self.rates.len()
    }

    /// Get total number of stored rates
    pub fn num_entries(&self) -> usize {
        self.rates.values().map(|tree| tree.len()).sum()
    }
}

impl RateSource for InMemoryRateSource {
    fn series(&self, code: &CurrencyCode, start: NaiveDate, end: NaiveDate) -> Result<RateSeries> {
        if start > end {
            return Err(AnalyzerError::InvalidDate(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        let Some(tree) = self.rates.get(code) else {
            if *code == self.reference {
                return Ok(reference_series_of(code, start, end));
            }
            return Err(AnalyzerError::MissingData(format!(
                "No rates available for {}",
                code
            )));
        };

        let observations = tree
            .range(start..=end)
            .map(|(date, stored)| Observation::new(stored.sequence_id.clone(), *date, stored.rate))
            .collect();
        Ok(RateSeries::from_observations(code.clone(), observations))
    }

    fn currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self.rates.keys().cloned().collect();
        if !self.rates.contains_key(&self.reference) {
            codes.push(self.reference.clone());
        }
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_range_query() {
        let mut source = InMemoryRateSource::new();
        for d in 2..=10 {
            source
                .add_rate(&usd(), date(d), &format!("{:03}/A/NBP/2025", d), 4.0 + d as f64 / 100.0)
                .unwrap();
        }

        let series = source.series(&usd(), date(4), date(6)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.observations[0].date, date(4));
        assert_eq!(series.observations[2].sequence_id, "006/A/NBP/2025");
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut source = InMemoryRateSource::new();
        assert!(source.add_rate(&usd(), date(2), "1", 0.0).is_err());
        assert!(source.add_rate(&usd(), date(2), "1", -4.0).is_err());
        assert_eq!(source.num_entries(), 0);
    }

    #[test]
    fn test_reference_currency_is_synthesized() {
        let source = InMemoryRateSource::new();
        let series = source
            .series(&CurrencyCode::reference(), date(1), date(7))
            .unwrap();
        assert_eq!(series.len(), 7);
        assert!(source.has_currency(&CurrencyCode::reference()));
    }

    #[test]
    fn test_configured_reference_is_synthesized() {
        let eur = CurrencyCode::new("EUR").unwrap();
        let source = InMemoryRateSource::with_reference(eur.clone());

        let series = source.series(&eur, date(1), date(3)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.currency, eur);
        assert!(series.iter().all(|o| o.rate == 1.0));

        assert!(matches!(
            source.series(&CurrencyCode::reference(), date(1), date(3)),
            Err(AnalyzerError::MissingData(_))
        ));
        assert_eq!(source.currencies(), vec![eur]);
    }

    #[test]
    fn test_unknown_currency() {
        let source = InMemoryRateSource::new();
        assert!(matches!(
            source.series(&usd(), date(1), date(7)),
            Err(AnalyzerError::MissingData(_))
        ));
        assert!(!source.has_currency(&usd()));
    }

    #[test]
    fn test_load_csv_and_currencies() {
        let mut source = InMemoryRateSource::new();
        let eur = CurrencyCode::new("EUR").unwrap();
        let loaded = source
            .load_csv(&eur, "date,rate\n2025-01-02,4.27\n2025-01-03,4.26\n")
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(source.num_currencies(), 1);
        assert_eq!(source.currencies(), vec![eur, CurrencyCode::reference()]);
    }

    #[test]
    fn test_add_series_is_all_or_nothing() {
        let mut source = InMemoryRateSource::new();
        let series = RateSeries::from_observations(
            usd(),
            vec![
                Observation::new("1", date(2), 4.1),
                Observation::new("2", date(3), 0.0),
            ],
        );
        assert!(source.add_series(&series).is_err());
        assert_eq!(source.num_entries(), 0);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();

        let mut file = std::fs::File::create(dir.path().join("chf.csv")).unwrap();
        writeln!(file, "date,rate\n2025-01-02,4.52\n2025-01-03,4.53").unwrap();

        std::fs::write(
            dir.path().join("usd.json"),
            r#"{"table":"A","currency":"dolar amerykański","code":"USD",
                "rates":[{"no":"001/A/NBP/2025","effectiveDate":"2025-01-02","mid":4.1219}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = InMemoryRateSource::new();
        assert_eq!(source.load_dir(dir.path()).unwrap(), 3);
        assert!(source.has_currency(&CurrencyCode::new("CHF").unwrap()));
        assert!(source.has_currency(&usd()));

        source.clear();
        assert_eq!(source.num_entries(), 0);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut source = InMemoryRateSource::new();
        assert!(source
            .load_path(Path::new("rates.parquet"), Some(&usd()))
            .is_err());
    }
}
