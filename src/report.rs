//! Analysis reports
//!
//! Bundles every metric for one query so front ends can fetch, compute and
//! render in one step. Reports serialize to JSON; NaN statistics become
//! `null` there.

use crate::analysis::distribution::{
    aligned_cross_rates, distribution_from_points, total_count, DistributionOptions,
};
use crate::analysis::sessions::SessionSummary;
use crate::analysis::statistics::StatisticalSummary;
use crate::currency::{CurrencyCode, CurrencyPair};
use crate::data::RateSource;
use crate::error::Result;
use crate::period::AnalysisWindow;
use crate::types::{ChangeDistributionItem, Percentage};
use serde::{Deserialize, Serialize};

/// Placeholder for values that cannot be computed
pub const MISSING_VALUE: &str = "---";

/// Statistics and session analysis of one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub currency: CurrencyCode,
    pub window: AnalysisWindow,
    pub statistics: StatisticalSummary,
    pub sessions: SessionSummary,
}

impl AnalysisReport {
    pub fn build(
        source: &dyn RateSource,
        currency: &CurrencyCode,
        window: &AnalysisWindow,
    ) -> Result<Self> {
        let series = source.series_for_window(currency, window)?;
        log::info!(
            "Analysing {} observations of {} from {} to {}",
            series.len(),
            currency,
            window.start,
            window.end
        );

        Ok(Self {
            currency: currency.clone(),
            window: *window,
            statistics: StatisticalSummary::from_series(&series),
            sessions: SessionSummary::from_series(&series),
        })
    }
}

/// Change distribution of one currency pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub pair: CurrencyPair,
    pub window: AnalysisWindow,
    pub options: DistributionOptions,
    pub aligned_dates: usize,
    pub total_count: usize,
    pub histogram: Vec<ChangeDistributionItem>,
}

impl DistributionReport {
    pub fn build(
        source: &dyn RateSource,
        pair: &CurrencyPair,
        window: &AnalysisWindow,
        options: &DistributionOptions,
    ) -> Result<Self> {
        let base = source.series_for_window(&pair.base, window)?;
        let quote = source.series_for_window(&pair.quote, window)?;

        let points = aligned_cross_rates(&base, &quote)?;
        let histogram = distribution_from_points(&points, options)?;
        let aligned_dates = points.len();
        if histogram.is_empty() {
            log::warn!(
                "No data for {} between {} and {} ({} aligned dates)",
                pair,
                window.start,
                window.end,
                aligned_dates
            );
        }

        Ok(Self {
            pair: pair.clone(),
            window: *window,
            options: *options,
            aligned_dates,
            total_count: total_count(&histogram),
            histogram,
        })
    }
}

/// Four decimals, or the placeholder for NaN
pub fn format_measure(value: f64) -> String {
    if value.is_nan() {
        MISSING_VALUE.to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// One decimal with a percent sign, or the placeholder when undefined
pub fn format_percentage(value: Option<Percentage>) -> String {
    match value {
        Some(p) => format!("{:.1}%", p),
        None => MISSING_VALUE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::distribution::DistributionMode;
    use crate::data::InMemoryRateSource;
    use crate::period::Period;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn source() -> InMemoryRateSource {
        let mut source = InMemoryRateSource::new();
        let usd = CurrencyCode::new("USD").unwrap();
        let eur = CurrencyCode::new("EUR").unwrap();
        for (d, usd_mid, eur_mid) in [
            (2, 4.10, 4.27),
            (3, 4.15, 4.27),
            (6, 4.15, 4.25),
            (7, 4.12, 4.26),
            (8, 4.18, 4.28),
        ] {
            source.add_rate(&usd, date(d), &format!("{}", d), usd_mid).unwrap();
            source.add_rate(&eur, date(d), &format!("{}", d), eur_mid).unwrap();
        }
        source
    }

    #[test]
    fn test_analysis_report() {
        let window = AnalysisWindow::new(date(1), Period::Week);
        let report =
            AnalysisReport::build(&source(), &CurrencyCode::new("USD").unwrap(), &window).unwrap();

        assert_eq!(report.statistics.observations, 5);
        assert_eq!(report.sessions.total, 4);
        assert_eq!(report.sessions.rising, 2);
        assert_eq!(report.sessions.falling, 1);
        assert_eq!(report.sessions.stable, 1);
        assert_eq!(format_measure(report.statistics.median), "4.1500");
        assert_eq!(format_measure(report.statistics.mode), "4.1500");
    }

    #[test]
    fn test_distribution_report_against_reference() {
        let window = AnalysisWindow::new(date(1), Period::Week);
        let pair = CurrencyPair::parse("USD/PLN").unwrap();

        let report =
            DistributionReport::build(&source(), &pair, &window, &DistributionOptions::default())
                .unwrap();

        assert_eq!(report.aligned_dates, 5);
        assert_eq!(report.total_count, 4);
    }

    #[test]
    fn test_distribution_report_cross_rates() {
        let window = AnalysisWindow::new(date(1), Period::Week);
        let pair = CurrencyPair::parse("EUR/USD").unwrap();
        let options = DistributionOptions::default().with_mode(DistributionMode::CrossRates);

        let report = DistributionReport::build(&source(), &pair, &window, &options).unwrap();
        assert_eq!(report.total_count, 5);
    }

    #[test]
    fn test_report_serializes_nan_as_null() {
        let window = AnalysisWindow::new(date(20), Period::Week);
        let report =
            AnalysisReport::build(&source(), &CurrencyCode::new("USD").unwrap(), &window).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["statistics"]["median"].is_null());
        assert!(json["sessions"]["rising_percentage"].is_null());
        assert_eq!(json["sessions"]["total"], 0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_measure(f64::NAN), "---");
        assert_eq!(format_measure(4.123456), "4.1235");
        assert_eq!(format_percentage(None), "---");
        assert_eq!(format_percentage(Some(0.0)), "0.0%");
        assert_eq!(format_percentage(Some(100.0 / 3.0)), "33.3%");
    }
}
