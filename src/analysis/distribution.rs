//! Cross-rate change distribution
//!
//! Two series quoted against the same reference currency are joined on their
//! common dates. The ratio of their rates on each date is the cross rate; the
//! day-over-day differences of the cross rate are binned into a histogram.
//!
//! # Example
//!
//! ```
//! use rusty_fx_analyzer::analysis::distribution::calculate_change_distribution;
//! use rusty_fx_analyzer::currency::CurrencyCode;
//! use rusty_fx_analyzer::types::{Observation, RateSeries};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
//! let usd = RateSeries::from_observations(
//!     CurrencyCode::new("USD").unwrap(),
//!     vec![
//!         Observation::new("1", day(1), 1.0),
//!         Observation::new("2", day(2), 2.0),
//!         Observation::new("3", day(3), 4.0),
//!         Observation::new("4", day(4), 8.0),
//!     ],
//! );
//! let pln = rusty_fx_analyzer::data::reference_series(day(1), day(4));
//!
//! let histogram = calculate_change_distribution(&usd, &pln, 4, 0.0001).unwrap();
//! assert_eq!(histogram.len(), 4);
//! assert_eq!(histogram.iter().map(|bin| bin.count).sum::<usize>(), 3);
//! ```

use crate::error::{AnalyzerError, Result};
use crate::types::{ChangeDistributionItem, Rate, RateSeries};
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Number of bins requested when the caller does not say otherwise
pub const DEFAULT_DESIRED_RANGES: usize = 14;

/// Narrowest bin the histogram will use
pub const DEFAULT_MIN_RANGE_SIZE: f64 = 0.0001;

/// What gets binned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    /// Day-over-day differences of the cross rate
    #[default]
    Changes,
    /// The cross rates themselves
    CrossRates,
}

/// Histogram parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionOptions {
    pub desired_ranges: usize,
    pub min_range_size: f64,
    pub mode: DistributionMode,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            desired_ranges: DEFAULT_DESIRED_RANGES,
            min_range_size: DEFAULT_MIN_RANGE_SIZE,
            mode: DistributionMode::Changes,
        }
    }
}

impl DistributionOptions {
    pub fn new(desired_ranges: usize, min_range_size: f64) -> Self {
        Self {
            desired_ranges,
            min_range_size,
            mode: DistributionMode::Changes,
        }
    }

    pub fn with_mode(mut self, mode: DistributionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.desired_ranges == 0 {
            return Err(AnalyzerError::InvalidRangeCount(self.desired_ranges));
        }
        if !self.min_range_size.is_finite() || self.min_range_size <= 0.0 {
            return Err(AnalyzerError::InvalidRangeSize(self.min_range_size));
        }
        Ok(())
    }
}

/// Cross rate on one aligned date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossRatePoint {
    pub date: NaiveDate,
    pub rate: Rate,
}

/// Fail on the first rate that is not a finite positive number
///
/// Both series are checked in full, including dates the other series lacks.
pub fn validate_rates(series_a: &RateSeries, series_b: &RateSeries) -> Result<()> {
    match series_a
        .iter()
        .chain(series_b.iter())
        .find(|o| !(o.rate.is_finite() && o.rate > 0.0))
    {
        Some(invalid) => {
            log::warn!(
                "Rejecting {} rate {} on {}",
                invalid.sequence_id,
                invalid.rate,
                invalid.date
            );
            Err(AnalyzerError::InvalidRate {
                date: invalid.date,
                rate: invalid.rate,
            })
        }
        None => Ok(()),
    }
}

// First rate seen for each date
fn first_rate_by_date(series: &RateSeries) -> HashMap<NaiveDate, Rate> {
    let mut index = HashMap::with_capacity(series.len());
    for observation in series {
        index.entry(observation.date).or_insert(observation.rate);
    }
    index
}

/// Cross rates `a / b` on the dates both series share, in the order of `series_a`
///
/// A ratio that overflows to infinity or underflows to zero fails with
/// [`AnalyzerError::InvalidRate`] naming its date.
pub fn aligned_cross_rates(
    series_a: &RateSeries,
    series_b: &RateSeries,
) -> Result<Vec<CrossRatePoint>> {
    validate_rates(series_a, series_b)?;

    let rates_a = first_rate_by_date(series_a);
    let rates_b = first_rate_by_date(series_b);

    let mut points = Vec::new();
    for observation in series_a {
        let (Some(rate_a), Some(rate_b)) = (
            rates_a.get(&observation.date),
            rates_b.get(&observation.date),
        ) else {
            continue;
        };

        let rate = rate_a / rate_b;
        if !(rate.is_finite() && rate > 0.0) {
            log::warn!(
                "Cross rate {}/{} out of range on {}: {} / {}",
                series_a.currency,
                series_b.currency,
                observation.date,
                rate_a,
                rate_b
            );
            return Err(AnalyzerError::InvalidRate {
                date: observation.date,
                rate,
            });
        }
        points.push(CrossRatePoint {
            date: observation.date,
            rate,
        });
    }

    log::debug!(
        "Aligned {}/{}: {} of {} and {} observations share a date",
        series_a.currency,
        series_b.currency,
        points.len(),
        series_a.len(),
        series_b.len()
    );

    Ok(points)
}

/// Successive differences of the cross rate (`n - 1` values for `n` points)
pub fn rate_changes(points: &[CrossRatePoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| pair[1].rate - pair[0].rate)
        .collect()
}

/// Bin `values` into contiguous ranges covering `[min, max]`
///
/// The bin width is the value span divided by `desired_ranges`, but never
/// narrower than `min_range_size`; when the floor applies, only as many bins
/// as the span needs are produced. Equal values collapse into a single bin.
/// Bins are half-open except the last, whose upper bound is exactly the
/// maximum value.
pub fn build_histogram(
    values: &[f64],
    desired_ranges: usize,
    min_range_size: f64,
) -> Vec<ChangeDistributionItem> {
    if values.is_empty() {
        return Vec::new();
    }

    let (global_min, global_max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = global_max - global_min;

    let range_size = min_range_size.max(span / desired_ranges as f64);
    let mut num_ranges = desired_ranges;
    if range_size == min_range_size {
        num_ranges = (span / range_size).ceil() as usize;
    }
    if global_min == global_max {
        num_ranges = 1;
    }

    log::debug!(
        "Histogram of {} values over [{}, {}]: {} ranges of {}",
        values.len(),
        global_min,
        global_max,
        num_ranges,
        range_size
    );

    (0..num_ranges)
        .map(|i| {
            let range_min = global_min + i as f64 * range_size;
            let range_max = if i == num_ranges - 1 {
                global_max
            } else {
                global_min + (i + 1) as f64 * range_size
            };

            let count = values
                .iter()
                .filter(|&&v| v >= range_min && (v < range_max || range_max == global_max))
                .count();

            ChangeDistributionItem {
                range_min,
                range_max,
                count,
            }
        })
        .collect()
}

/// Histogram of day-over-day cross-rate changes between two series
///
/// Fails with [`AnalyzerError::InvalidRate`] if either series holds a
/// non-positive rate. Series without common dates, or with a single common
/// date, give an empty histogram.
pub fn calculate_change_distribution(
    series_a: &RateSeries,
    series_b: &RateSeries,
    desired_ranges: usize,
    min_range_size: f64,
) -> Result<Vec<ChangeDistributionItem>> {
    calculate_change_distribution_with(
        series_a,
        series_b,
        &DistributionOptions::new(desired_ranges, min_range_size),
    )
}

/// [`calculate_change_distribution`] with explicit options
pub fn calculate_change_distribution_with(
    series_a: &RateSeries,
    series_b: &RateSeries,
    options: &DistributionOptions,
) -> Result<Vec<ChangeDistributionItem>> {
    let points = aligned_cross_rates(series_a, series_b)?;
    distribution_from_points(&points, options)
}

/// Histogram of already aligned cross rates
pub fn distribution_from_points(
    points: &[CrossRatePoint],
    options: &DistributionOptions,
) -> Result<Vec<ChangeDistributionItem>> {
    options.validate()?;

    let values = match options.mode {
        DistributionMode::Changes => rate_changes(points),
        DistributionMode::CrossRates => points.iter().map(|p| p.rate).collect(),
    };

    Ok(build_histogram(
        &values,
        options.desired_ranges,
        options.min_range_size,
    ))
}

/// Sum of all bin counts
pub fn total_count(histogram: &[ChangeDistributionItem]) -> usize {
    histogram.iter().map(|bin| bin.count).sum()
}

/// Largest bin count (zero for an empty histogram)
pub fn max_count(histogram: &[ChangeDistributionItem]) -> usize {
    histogram.iter().map(|bin| bin.count).max().unwrap_or(0)
}
