//! Core types: observations and rate series

use crate::currency::CurrencyCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exchange rate (mid rate against the reference currency)
pub type Rate = f64;

/// Percentage type (0.0 to 100.0)
pub type Percentage = f64;

/// One published mid rate
///
/// `rate` is expected to be positive but this is not enforced here; the
/// change distribution validates it before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Publication number of the source table (e.g. "012/A/NBP/2024")
    pub sequence_id: String,
    pub date: NaiveDate,
    pub rate: Rate,
}

impl Observation {
    /// Create a new observation
    pub fn new(sequence_id: impl Into<String>, date: NaiveDate, rate: Rate) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            date,
            rate,
        }
    }
}

/// Observations of a single currency
///
/// Order is whatever the source delivered; it is not assumed to be
/// chronological. Consumers that need time order use [`RateSeries::sorted_by_date`],
/// which never touches the series itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    pub currency: CurrencyCode,
    pub observations: Vec<Observation>,
}

impl RateSeries {
    /// Create an empty series
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            observations: Vec::new(),
        }
    }

    /// Create a series from observations
    pub fn from_observations(currency: CurrencyCode, observations: Vec<Observation>) -> Self {
        Self {
            currency,
            observations,
        }
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Rates in source order
    pub fn rates(&self) -> Vec<Rate> {
        self.observations.iter().map(|o| o.rate).collect()
    }

    /// Copy of the observations sorted by date ascending
    ///
    /// The sort is stable, so observations sharing a date keep source order.
    pub fn sorted_by_date(&self) -> Vec<Observation> {
        let mut sorted = self.observations.clone();
        sorted.sort_by_key(|o| o.date);
        sorted
    }

    /// Earliest and latest observation date
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.iter().map(|o| o.date).min()?;
        let last = self.observations.iter().map(|o| o.date).max()?;
        Some((first, last))
    }
}

impl<'a> IntoIterator for &'a RateSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// One histogram bin of the change distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeDistributionItem {
    pub range_min: f64,
    pub range_max: f64,
    pub count: usize,
}

impl ChangeDistributionItem {
    /// Bin label as shown in tables and charts ("-0.0100 to 0.0050")
    pub fn range_label(&self) -> String {
        format!("{:.4} to {:.4}", self.range_min, self.range_max)
    }

    pub fn width(&self) -> f64 {
        self.range_max - self.range_min
    }
}
