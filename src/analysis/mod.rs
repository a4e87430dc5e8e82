//! Exchange-rate analytics
//!
//! Pure functions over [`RateSeries`](crate::types::RateSeries):
//!
//! - **statistics**: median, mode, variance, standard deviation
//! - **sessions**: rising/falling/stable session counts and shares
//! - **distribution**: histogram of cross-rate changes between two currencies

pub mod distribution;
pub mod sessions;
pub mod statistics;

pub use distribution::{
    aligned_cross_rates, build_histogram, calculate_change_distribution,
    calculate_change_distribution_with, distribution_from_points, CrossRatePoint,
    DistributionMode, DistributionOptions, DEFAULT_DESIRED_RANGES, DEFAULT_MIN_RANGE_SIZE,
};
pub use sessions::{
    count_falling, count_rising, count_stable, count_total, falling_percentage,
    rising_percentage, stable_percentage, SessionDirection, SessionSummary,
};
pub use statistics::{median, mode, standard_deviation, variance, StatisticalSummary};
