//! Session direction analysis
//!
//! A session is one day's rate compared with the previous day's. Each adjacent
//! pair of the date-sorted series is exactly one of rising, falling or stable.

use crate::types::{Percentage, RateSeries};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Direction of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionDirection {
    Rising,
    Falling,
    Stable,
}

/// Directions of all sessions, in date order
///
/// Works on a sorted copy; the series is left as the caller passed it. Rates
/// are compared exactly, without tolerance.
pub fn session_directions(series: &RateSeries) -> Vec<SessionDirection> {
    let sorted = series.sorted_by_date();
    sorted
        .windows(2)
        .filter_map(|pair| match pair[1].rate.partial_cmp(&pair[0].rate) {
            Some(Ordering::Greater) => Some(SessionDirection::Rising),
            Some(Ordering::Less) => Some(SessionDirection::Falling),
            Some(Ordering::Equal) => Some(SessionDirection::Stable),
            None => {
                log::warn!(
                    "Unordered rates on {} ({}) and {} ({})",
                    pair[0].date,
                    pair[0].rate,
                    pair[1].date,
                    pair[1].rate
                );
                None
            }
        })
        .collect()
}

fn count_direction(series: &RateSeries, direction: SessionDirection) -> usize {
    session_directions(series)
        .into_iter()
        .filter(|d| *d == direction)
        .count()
}

/// Number of sessions (adjacent pairs); zero for fewer than two observations
///
/// Pairs touching a NaN rate are counted here but fall in no direction, so
/// rising, falling and stable add up to this total only for NaN-free series.
pub fn count_total(series: &RateSeries) -> usize {
    series.len().saturating_sub(1)
}

pub fn count_rising(series: &RateSeries) -> usize {
    count_direction(series, SessionDirection::Rising)
}

pub fn count_falling(series: &RateSeries) -> usize {
    count_direction(series, SessionDirection::Falling)
}

pub fn count_stable(series: &RateSeries) -> usize {
    count_direction(series, SessionDirection::Stable)
}

fn percentage(count: usize, total: usize) -> Option<Percentage> {
    if total == 0 {
        return None;
    }
    Some(count as f64 / total as f64 * 100.0)
}

/// Share of rising sessions; `None` when there are no sessions
pub fn rising_percentage(series: &RateSeries) -> Option<Percentage> {
    percentage(count_rising(series), count_total(series))
}

/// Share of falling sessions; `None` when there are no sessions
pub fn falling_percentage(series: &RateSeries) -> Option<Percentage> {
    percentage(count_falling(series), count_total(series))
}

/// Share of stable sessions; `None` when there are no sessions
pub fn stable_percentage(series: &RateSeries) -> Option<Percentage> {
    percentage(count_stable(series), count_total(series))
}

/// Session counts and shares of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub rising: usize,
    pub falling: usize,
    pub stable: usize,
    pub rising_percentage: Option<Percentage>,
    pub falling_percentage: Option<Percentage>,
    pub stable_percentage: Option<Percentage>,
}

impl SessionSummary {
    /// Classify every session once and derive all counts from it
    pub fn from_series(series: &RateSeries) -> Self {
        let directions = session_directions(series);
        let count = |direction: SessionDirection| {
            directions.iter().filter(|d| **d == direction).count()
        };

        let total = count_total(series);
        let rising = count(SessionDirection::Rising);
        let falling = count(SessionDirection::Falling);
        let stable = count(SessionDirection::Stable);

        Self {
            total,
            rising,
            falling,
            stable,
            rising_percentage: percentage(rising, total),
            falling_percentage: percentage(falling, total),
            stable_percentage: percentage(stable, total),
        }
    }
}
