//! # rusty_fx_analyzer
//!
//! Exchange-rate analytics over NBP mid rates.
//!
//! Given a series of dated mid rates (one per business day, quoted against
//! PLN), the crate computes descriptive statistics, counts rising, falling and
//! stable sessions, and builds a histogram of day-over-day cross-rate changes
//! between two currencies.
//!
//! ## Example
//!
//! ```rust
//! use rusty_fx_analyzer::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let usd = RateSeries::from_observations(
//!     CurrencyCode::new("USD").unwrap(),
//!     vec![
//!         Observation::new("001/A/NBP/2025", day(2), 4.1219),
//!         Observation::new("002/A/NBP/2025", day(3), 4.1512),
//!         Observation::new("003/A/NBP/2025", day(6), 4.1512),
//!     ],
//! );
//!
//! assert_eq!(count_rising(&usd), 1);
//! assert_eq!(count_stable(&usd), 1);
//! assert_eq!(mode(&usd), 4.1512);
//! ```

pub mod analysis;
pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod period;
pub mod report;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::analysis::{
        calculate_change_distribution, calculate_change_distribution_with, count_falling,
        count_rising, count_stable, count_total, falling_percentage, median, mode,
        rising_percentage, stable_percentage, standard_deviation, variance, DistributionMode,
        DistributionOptions, SessionSummary, StatisticalSummary,
    };
    pub use crate::config::AnalyzerConfig;
    pub use crate::currency::{CurrencyCode, CurrencyPair};
    pub use crate::data::{reference_series, InMemoryRateSource, RateSource};
    pub use crate::error::{AnalyzerError, Result};
    pub use crate::period::{AnalysisWindow, Period};
    pub use crate::report::{AnalysisReport, DistributionReport};
    pub use crate::types::*;
}
