//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude a single amount may have: one trillion units
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000 * 100);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use fintrack::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Whether the magnitude is within [`Money::MAX_AMOUNT`]
    pub const fn is_within_limit(&self) -> bool {
        self.0.saturating_abs() <= Self::MAX_AMOUNT.0
    }

    /// Divide by a whole number, rounding half away from zero
    ///
    /// Returns zero for a zero divisor.
    ///
    /// ```
    /// use fintrack::models::Money;
    /// assert_eq!(Money::from_cents(1000).div_round(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1001).div_round(2).cents(), 501);
    /// ```
    pub fn div_round(&self, divisor: i64) -> Self {
        if divisor == 0 {
            return Self::zero();
        }
        let num = self.0 as i128;
        let den = divisor as i128;
        let quotient = num / den;
        let remainder = num % den;
        let rounded = if remainder.abs() * 2 >= den.abs() {
            if (num < 0) != (den < 0) {
                quotient - 1
            } else {
                quotient + 1
            }
        } else {
            quotient
        };
        Self(rounded as i64)
    }

    /// Percentage of `whole` this amount represents; 0 when `whole` is zero
    pub fn percent_of(&self, whole: Money) -> f64 {
        if whole.is_zero() {
            0.0
        } else {
            (self.0 as f64 / whole.0 as f64) * 100.0
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "10,50", "-10.50", "$10.50", "10", "1 500"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = if cleaned.contains('.') {
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parse_digits(parts[0]).ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            let cents_str = parts[1];
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => {
                    parse_digits(cents_str)
                        .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                2 => parse_digits(cents_str)
                    .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?,
                _ => return Err(MoneyParseError::TooPrecise(s.to_string())),
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(cents))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        } else {
            parse_digits(&cleaned)
                .and_then(|units| units.checked_mul(100))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        };

        let amount = Self(if negative { -cents } else { cents });
        if !amount.is_within_limit() {
            return Err(MoneyParseError::TooLarge(s.to_string()));
        }
        Ok(amount)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, factor: i64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise(s) => {
                write!(f, "Amount has more than two decimal places: {}", s)
            }
            MoneyParseError::TooLarge(s) => {
                write!(f, "Amount exceeds {}: {}", Money::MAX_AMOUNT, s)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
        assert_eq!(Money::from_units(3).cents(), 300);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::from_cents(-1050).format_with_symbol("$"), "-$10.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!((b * 20).cents(), 10000);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(Money::from_units(1000).div_round(10), Money::from_units(100));
        assert_eq!(Money::from_cents(5).div_round(2).cents(), 3);
        assert_eq!(Money::from_cents(-5).div_round(2).cents(), -3);
        assert_eq!(Money::from_cents(4).div_round(3).cents(), 1);
        assert_eq!(Money::from_cents(100).div_round(0), Money::zero());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(Money::from_units(25).percent_of(Money::from_units(100)), 25.0);
        assert_eq!(Money::from_units(25).percent_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10,50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("1 500").unwrap().cents(), 150000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("1e5").is_err());
        assert!(matches!(
            Money::parse("1.005"),
            Err(MoneyParseError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_sum() {
        let amounts = [
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 600);
        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }

    #[test]
    fn test_parse_rejects_amounts_over_limit() {
        assert_eq!(Money::parse("1000000000000").unwrap(), Money::MAX_AMOUNT);
        assert!(matches!(
            Money::parse("10000000000000000"),
            Err(MoneyParseError::TooLarge(_))
        ));
        assert!(matches!(
            Money::parse("-1000000000000.01"),
            Err(MoneyParseError::TooLarge(_))
        ));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!((huge + Money::from_cents(10)).cents(), i64::MAX);
        assert_eq!((huge * 3).cents(), i64::MAX);
        assert_eq!((-huge - Money::from_cents(10)).cents(), i64::MIN);
    }
}
