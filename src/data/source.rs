//! Rate source trait and the synthetic reference series

use crate::currency::CurrencyCode;
use crate::error::Result;
use crate::period::AnalysisWindow;
use crate::types::{Observation, RateSeries};
use chrono::{Duration, NaiveDate};

/// Trait for reading historical mid rates
///
/// Implementations return every observation of `code` dated within
/// `start..=end`. Order is not guaranteed; analysis code sorts as needed.
pub trait RateSource: Send + Sync {
    /// Observations of one currency within an inclusive date range
    fn series(&self, code: &CurrencyCode, start: NaiveDate, end: NaiveDate) -> Result<RateSeries>;

    /// Currencies this source can answer for
    fn currencies(&self) -> Vec<CurrencyCode>;

    /// Observations of one currency within an analysis window
    fn series_for_window(
        &self,
        code: &CurrencyCode,
        window: &AnalysisWindow,
    ) -> Result<RateSeries> {
        self.series(code, window.start, window.end)
    }

    /// Check if the currency is available
    fn has_currency(&self, code: &CurrencyCode) -> bool {
        self.currencies().contains(code)
    }
}

/// Constant 1.0 series of PLN, one entry per calendar day
///
/// The reference currency is never quoted by the feed; its rate against
/// itself is 1.0 on every day, weekends included.
pub fn reference_series(start: NaiveDate, end: NaiveDate) -> RateSeries {
    reference_series_of(&CurrencyCode::reference(), start, end)
}

/// Constant 1.0 series of any currency used as the reference
pub fn reference_series_of(code: &CurrencyCode, start: NaiveDate, end: NaiveDate) -> RateSeries {
    let mut series = RateSeries::new(code.clone());
    let mut date = start;
    let mut n = 1;
    while date <= end {
        series.push(Observation::new(format!("{}", n), date, 1.0));
        date += Duration::days(1);
        n += 1;
    }

    log::debug!(
        "Synthesized {} {} reference rates from {} to {}",
        series.len(),
        series.currency,
        start,
        end
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_reference_series_covers_every_day() {
        let series = reference_series(date(2, 27), date(3, 2));

        // 2024 is a leap year
        assert_eq!(series.len(), 5);
        assert!(series.currency.is_reference());
        assert!(series.iter().all(|o| o.rate == 1.0));
        assert_eq!(series.date_range(), Some((date(2, 27), date(3, 2))));
    }

    #[test]
    fn test_reference_series_single_day_and_empty() {
        assert_eq!(reference_series(date(1, 1), date(1, 1)).len(), 1);
        assert!(reference_series(date(1, 2), date(1, 1)).is_empty());
    }

    #[test]
    fn test_reference_series_of_other_currency() {
        let eur = CurrencyCode::new("EUR").unwrap();
        let series = reference_series_of(&eur, date(1, 1), date(1, 3));

        assert_eq!(series.currency, eur);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|o| o.rate == 1.0));
    }
}
