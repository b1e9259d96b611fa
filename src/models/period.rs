//! Monthly period representation
//!
//! A period is a calendar (year, month) pair. It windows every transaction
//! query and drives navigation in the dashboard.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, e.g. "2025-01"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period containing today's local date
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-indexed
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Move by `offset` months in either direction, rolling the year over
    ///
    /// ```
    /// use fintrack::models::Period;
    /// let dec = Period::new(2025, 12).unwrap();
    /// assert_eq!(dec.shift(1), Period::new(2026, 1).unwrap());
    /// assert_eq!(dec.shift(-12), Period::new(2024, 12).unwrap());
    /// ```
    pub fn shift(&self, offset: i32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + offset as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Get the next period
    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Get the previous period
    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    /// Number of days in this month
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Get the first day of this period
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Get the end date of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// The date for `day` in this month, clamped to the last day of the month
    pub fn clamped_date(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.end_date())
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Whether `today` lies in this period
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.contains(today)
    }

    /// Parse a period string in "YYYY-MM" form
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 || parts[0].len() != 4 {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }

    /// Human-readable label, e.g. "March 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.start_date().format("%B"), self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Calendar day count of `month` in `year`
///
/// February has 29 days when the year is divisible by 4 and either not
/// divisible by 100 or divisible by 400. Returns 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => {
                write!(f, "Invalid period format: {} (expected YYYY-MM)", s)
            }
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}
