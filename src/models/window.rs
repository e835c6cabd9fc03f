//! Reporting window
//!
//! A report always compares two adjacent calendar months: the reference month
//! and the month before it. Both are half-open `[start, end)` ranges, which is
//! what the billing API expects for its time period.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used by the billing API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One calendar month as a half-open date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthPeriod {
    /// First day of the month (inclusive)
    pub start: NaiveDate,
    /// First day of the following month (exclusive)
    pub end: NaiveDate,
}

impl MonthPeriod {
    /// Month starting at the given month index (months since year 0, January = 0)
    fn from_index(index: i64) -> Self {
        Self {
            start: first_of_month(index),
            end: first_of_month(index + 1),
        }
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// The previous and current month around a reference (month, year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// The month before the reference month
    pub previous: MonthPeriod,
    /// The reference month itself
    pub current: MonthPeriod,
}

impl ReportWindow {
    /// Compute the window for a reference month
    ///
    /// Months outside 1-12 roll over by calendar arithmetic: month 13 of 2025
    /// is January 2026 and month 0 of 2025 is December 2024.
    pub fn compute(month: u32, year: i32) -> Self {
        let reference = i64::from(year) * 12 + i64::from(month) - 1;
        Self {
            previous: MonthPeriod::from_index(reference - 1),
            current: MonthPeriod::from_index(reference),
        }
    }

    /// Start of the queried range (first day of the previous month)
    pub fn start(&self) -> NaiveDate {
        self.previous.start
    }

    /// End of the queried range (first day of the month after the reference)
    pub fn end(&self) -> NaiveDate {
        self.current.end
    }

    /// Start date as `YYYY-MM-DD`
    pub fn start_str(&self) -> String {
        self.start().format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`
    pub fn end_str(&self) -> String {
        self.end().format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_str(), self.end_str())
    }
}

/// First day of the month at `index` months after January of year 0.
/// Saturates at the ends of the supported calendar.
fn first_of_month(index: i64) -> NaiveDate {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;

    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
        .unwrap_or(if index < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}
