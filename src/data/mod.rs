//! Rate data sources
//!
//! The analytics never fetch anything themselves; they consume
//! [`RateSeries`](crate::types::RateSeries) values handed over by a
//! [`RateSource`].
//!
//! # Components
//!
//! - **source**: the `RateSource` trait and the synthetic reference series
//! - **in_memory**: rates held in memory, loaded from NBP JSON or CSV files
//! - **nbp**: NBP web API payload decoding and request paths
//! - **csv_loader**: CSV observation files

pub mod csv_loader;
pub mod in_memory;
pub mod nbp;
pub mod source;

pub use in_memory::InMemoryRateSource;
pub use nbp::{currency_codes, parse_rates_payload, parse_tables, NbpRatesPayload, NbpTable};
pub use source::{reference_series, reference_series_of, RateSource};
