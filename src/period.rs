//! Analysis periods and date windows

use crate::error::{AnalyzerError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    Week,
    TwoWeeks,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Week,
        Period::TwoWeeks,
        Period::Month,
        Period::Quarter,
        Period::HalfYear,
        Period::Year,
    ];

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        match self {
            Period::Week => 7,
            Period::TwoWeeks => 14,
            Period::Month => 31,
            Period::Quarter => 92,
            Period::HalfYear => 182,
            Period::Year => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "1 week",
            Period::TwoWeeks => "2 weeks",
            Period::Month => "1 month",
            Period::Quarter => "1 quarter",
            Period::HalfYear => "half a year",
            Period::Year => "1 year",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "WEEK",
            Period::TwoWeeks => "TWO_WEEKS",
            Period::Month => "MONTH",
            Period::Quarter => "QUARTER",
            Period::HalfYear => "HALF_YEAR",
            Period::Year => "YEAR",
        }
    }
}

impl FromStr for Period {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "WEEK" | "1W" => Ok(Period::Week),
            "TWO_WEEKS" | "2W" => Ok(Period::TwoWeeks),
            "MONTH" | "1M" => Ok(Period::Month),
            "QUARTER" | "3M" => Ok(Period::Quarter),
            "HALF_YEAR" | "6M" => Ok(Period::HalfYear),
            "YEAR" | "1Y" => Ok(Period::Year),
            other => Err(AnalyzerError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latest begin date for which a window of `period` does not reach past `end`
pub fn max_period_begin_date(period: Period, end: NaiveDate) -> NaiveDate {
    end - Duration::days(period.days())
}

/// Parse an ISO 8601 calendar date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AnalyzerError::InvalidDate(format!("{}: {}", s, e)))
}

/// Inclusive date range an analysis runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    /// Window of `period` starting at `begin`
    pub fn new(begin: NaiveDate, period: Period) -> Self {
        Self {
            period,
            start: begin,
            end: begin + Duration::days(period.days()),
        }
    }

    /// Window of `period` ending today
    pub fn trailing(period: Period, today: NaiveDate) -> Self {
        Self {
            period,
            start: max_period_begin_date(period, today),
            end: today,
        }
    }

    /// Reject windows reaching into the future or before the archive starts
    pub fn validate(&self, today: NaiveDate, min_allowed: NaiveDate) -> Result<()> {
        let latest = max_period_begin_date(self.period, today);
        if self.start > latest {
            return Err(AnalyzerError::BeginDateInFuture {
                begin: self.start,
                latest,
            });
        }
        if self.start < min_allowed {
            return Err(AnalyzerError::BeginDateBeforeArchive {
                begin: self.start,
                earliest: min_allowed,
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_begin_date_subtracts_days() {
        assert_eq!(
            max_period_begin_date(Period::Week, date(2025, 1, 8)),
            date(2025, 1, 1)
        );
        assert_eq!(
            max_period_begin_date(Period::TwoWeeks, date(2025, 3, 15)),
            date(2025, 3, 1)
        );
    }

    #[test]
    fn test_begin_date_for_different_periods() {
        let end = date(2025, 8, 14);
        // July has 31 days, 2024-08-14..2025-08-14 spans no leap day
        assert_eq!(max_period_begin_date(Period::Month, end), date(2025, 7, 14));
        assert_eq!(max_period_begin_date(Period::Year, end), date(2024, 8, 14));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("MONTH".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("two_weeks".parse::<Period>().unwrap(), Period::TwoWeeks);
        assert_eq!("half-year".parse::<Period>().unwrap(), Period::HalfYear);
        assert_eq!("3m".parse::<Period>().unwrap(), Period::Quarter);
        assert!("DECADE".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_serde_matches_display() {
        for period in Period::ALL {
            let json = serde_json::to_string(&period).unwrap();
            assert_eq!(json, format!("\"{}\"", period));
        }
    }

    #[test]
    fn test_window_validation() {
        let today = date(2025, 3, 15);
        let earliest = date(2002, 1, 2);

        let ok = AnalysisWindow::new(date(2025, 2, 1), Period::Month);
        assert!(ok.validate(today, earliest).is_ok());
        assert_eq!(ok.end, date(2025, 3, 4));

        let future = AnalysisWindow::new(date(2025, 3, 1), Period::Month);
        assert!(matches!(
            future.validate(today, earliest),
            Err(AnalyzerError::BeginDateInFuture { .. })
        ));

        let archived = AnalysisWindow::new(date(2001, 12, 1), Period::Week);
        assert!(matches!(
            archived.validate(today, earliest),
            Err(AnalyzerError::BeginDateBeforeArchive { .. })
        ));
    }

    #[test]
    fn test_trailing_window() {
        let window = AnalysisWindow::trailing(Period::Week, date(2025, 1, 8));
        assert_eq!(window.start, date(2025, 1, 1));
        assert!(window.contains(date(2025, 1, 8)));
        assert!(!window.contains(date(2025, 1, 9)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2020-01-02").unwrap(), date(2020, 1, 2));
        assert!(parse_date("02.01.2020").is_err());
    }
}
