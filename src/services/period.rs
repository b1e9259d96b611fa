//! Period selection
//!
//! [`PeriodSelector`] holds the month being viewed. Changing it performs no
//! I/O; the owner reloads data for the new period.

use chrono::{Datelike, NaiveDate};

use crate::error::{FinError, FinResult};
use crate::models::Period;

/// The currently viewed (year, month)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelector {
    current: Period,
}

impl PeriodSelector {
    pub fn new(period: Period) -> Self {
        Self { current: period }
    }

    /// Start at the month containing `today`
    pub fn starting_at(today: NaiveDate) -> Self {
        Self::new(Period::containing(today))
    }

    pub fn current(&self) -> Period {
        self.current
    }

    /// Move by `offset` months and return the new selection
    pub fn shift(&mut self, offset: i32) -> Period {
        self.current = self.current.shift(offset);
        self.current
    }

    pub fn set(&mut self, period: Period) {
        self.current = period;
    }
}

const MONTH_NAMES: [(&str, u32); 23] = [
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Parse a period argument relative to `today`
///
/// Accepts "YYYY-MM", "current"/"this", "last"/"prev", "next", and month
/// names with an optional year ("march", "Mar 2024").
pub fn parse_period(s: &str, today: NaiveDate) -> FinResult<Period> {
    let lower = s.trim().to_lowercase();
    let this_month = Period::containing(today);

    match lower.as_str() {
        "current" | "now" | "this" => return Ok(this_month),
        "last" | "prev" | "previous" => return Ok(this_month.prev()),
        "next" => return Ok(this_month.next()),
        _ => {}
    }

    let mut words = lower.split_whitespace();
    if let Some(first) = words.next() {
        if let Some((_, month)) = MONTH_NAMES.iter().find(|(name, _)| *name == first) {
            let year = match words.next() {
                Some(y) => y
                    .parse::<i32>()
                    .map_err(|_| FinError::Validation(format!("Invalid year in period: {}", s)))?,
                None => today.year(),
            };
            return Period::new(year, *month).map_err(|e| FinError::Validation(e.to_string()));
        }
    }

    Period::parse(&lower).map_err(|e| FinError::Validation(e.to_string()))
}

/// Parse an optional period argument, defaulting to the month of `today`
pub fn parse_or_current(s: Option<&str>, today: NaiveDate) -> FinResult<Period> {
    match s {
        Some(s) => parse_period(s, today),
        None => Ok(Period::containing(today)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn period(y: i32, m: u32) -> Period {
        Period::new(y, m).unwrap()
    }

    #[test]
    fn test_selector_shift() {
        let mut selector = PeriodSelector::new(period(2025, 12));
        assert_eq!(selector.shift(1), period(2026, 1));
        assert_eq!(selector.current(), period(2026, 1));
        assert_eq!(selector.shift(-1), period(2025, 12));
        assert_eq!(selector.shift(-24), period(2023, 12));
    }

    #[test]
    fn test_selector_starts_at_today() {
        let selector = PeriodSelector::starting_at(today());
        assert_eq!(selector.current(), period(2025, 1));
    }

    #[test]
    fn test_parse_relative() {
        assert_eq!(parse_period("current", today()).unwrap(), period(2025, 1));
        assert_eq!(parse_period("last", today()).unwrap(), period(2024, 12));
        assert_eq!(parse_period("NEXT", today()).unwrap(), period(2025, 2));
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_period("march", today()).unwrap(), period(2025, 3));
        assert_eq!(parse_period("Mar 2024", today()).unwrap(), period(2024, 3));
        assert!(parse_period("mar twenty", today()).unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_iso_and_errors() {
        assert_eq!(parse_period("2024-02", today()).unwrap(), period(2024, 2));
        assert!(parse_period("2024-13", today()).unwrap_err().is_validation());
        assert!(parse_period("soon", today()).is_err());
        assert_eq!(parse_or_current(None, today()).unwrap(), period(2025, 1));
    }
}
