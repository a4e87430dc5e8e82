//! Descriptive statistics over the mid rates of a series
//!
//! Every measure returns `f64::NAN` when there is nothing to report: an empty
//! series, or (for the mode) no single most frequent rate.

use crate::types::{Rate, RateSeries};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Median rate (mean of the two central rates for an even count)
pub fn median(series: &RateSeries) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }

    let mut rates = series.rates();
    rates.sort_by(|a, b| a.total_cmp(b));

    let mid = rates.len() / 2;
    if rates.len() % 2 == 0 {
        (rates[mid - 1] + rates[mid]) / 2.0
    } else {
        rates[mid]
    }
}

/// Most frequent rate
///
/// Distinct rates are visited in order of first appearance. A strictly higher
/// count replaces the current mode, an equal count clears it. A maximum count
/// of one never yields a mode.
pub fn mode(series: &RateSeries) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }

    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut frequencies: Vec<(Rate, usize)> = Vec::new();
    for observation in series {
        let slot = *index
            .entry(rate_key(observation.rate))
            .or_insert_with(|| {
                frequencies.push((observation.rate, 0));
                frequencies.len() - 1
            });
        frequencies[slot].1 += 1;
    }

    let mut max_count = 0;
    let mut mode = f64::NAN;
    for &(value, count) in &frequencies {
        if count > max_count {
            max_count = count;
            mode = value;
        } else if count == max_count {
            mode = f64::NAN;
        }
    }

    if max_count == 1 {
        f64::NAN
    } else {
        mode
    }
}

/// Population variance (squared deviations divided by N)
pub fn variance(series: &RateSeries) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    series.iter().map(|o| o.rate).population_variance()
}

/// Population standard deviation
pub fn standard_deviation(series: &RateSeries) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    variance(series).sqrt()
}

// Equal rates must share a key: fold -0.0 into 0.0 and all NaNs into one.
fn rate_key(rate: Rate) -> u64 {
    if rate == 0.0 {
        0.0f64.to_bits()
    } else if rate.is_nan() {
        f64::NAN.to_bits()
    } else {
        rate.to_bits()
    }
}

/// All statistical measures of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub observations: usize,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub standard_deviation: f64,
}

impl StatisticalSummary {
    pub fn from_series(series: &RateSeries) -> Self {
        let (min, max) = if series.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            series.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| {
                (lo.min(o.rate), hi.max(o.rate))
            })
        };

        Self {
            observations: series.len(),
            min,
            max,
            median: median(series),
            mode: mode(series),
            variance: variance(series),
            standard_deviation: standard_deviation(series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;
    use crate::types::Observation;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn build_rates(mids: &[f64]) -> RateSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let observations = mids
            .iter()
            .enumerate()
            .map(|(i, &mid)| {
                Observation::new(format!("{}", i + 1), start + Duration::days(i as i64), mid)
            })
            .collect();
        RateSeries::from_observations(CurrencyCode::new("USD").unwrap(), observations)
    }

    #[test]
    fn test_empty_series_is_nan() {
        let empty = build_rates(&[]);
        assert!(median(&empty).is_nan());
        assert!(mode(&empty).is_nan());
        assert!(variance(&empty).is_nan());
        assert!(standard_deviation(&empty).is_nan());
    }

    #[test]
    fn test_median_odd_count() {
        assert_relative_eq!(median(&build_rates(&[1.0, 3.0, 2.0])), 2.0);
    }

    #[test]
    fn test_median_even_count() {
        assert_relative_eq!(median(&build_rates(&[1.0, 4.0, 3.0, 2.0])), 2.5);
    }

    #[test]
    fn test_median_does_not_reorder_input() {
        let series = build_rates(&[3.0, 1.0, 2.0]);
        median(&series);
        assert_eq!(series.rates(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_mode_exists() {
        assert_relative_eq!(mode(&build_rates(&[1.0, 2.0, 2.0, 3.0])), 2.0);
    }

    #[test]
    fn test_mode_all_unique() {
        assert!(mode(&build_rates(&[1.0, 2.0, 3.0])).is_nan());
    }

    #[test]
    fn test_mode_tie() {
        assert!(mode(&build_rates(&[1.0, 1.0, 2.0, 2.0])).is_nan());
    }

    #[test]
    fn test_mode_later_strict_maximum_wins_after_tie() {
        // 1 and 2 tie at two, then 3 appears three times
        let series = build_rates(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0]);
        assert_relative_eq!(mode(&series), 3.0);
    }

    #[test]
    fn test_mode_lower_count_after_maximum_keeps_mode() {
        let series = build_rates(&[4.0, 4.0, 4.0, 5.0, 5.0, 6.0]);
        assert_relative_eq!(mode(&series), 4.0);
    }

    #[test]
    fn test_mode_single_value() {
        assert!(mode(&build_rates(&[4.2])).is_nan());
        assert_relative_eq!(mode(&build_rates(&[4.2, 4.2])), 4.2);
    }

    #[test]
    fn test_variance_and_std_dev() {
        let series = build_rates(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(variance(&series), 2.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(
            standard_deviation(&series),
            (2.0f64 / 3.0).sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_variance_of_constant_series() {
        let series = build_rates(&[4.5, 4.5, 4.5]);
        assert_relative_eq!(variance(&series), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summary() {
        let summary = StatisticalSummary::from_series(&build_rates(&[1.0, 2.0, 2.0, 3.0]));
        assert_eq!(summary.observations, 4);
        assert_relative_eq!(summary.min, 1.0);
        assert_relative_eq!(summary.max, 3.0);
        assert_relative_eq!(summary.median, 2.0);
        assert_relative_eq!(summary.mode, 2.0);
        assert_relative_eq!(summary.variance, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_summary_of_empty_series() {
        let summary = StatisticalSummary::from_series(&build_rates(&[]));
        assert_eq!(summary.observations, 0);
        assert!(summary.min.is_nan());
        assert!(summary.median.is_nan());
    }
}
