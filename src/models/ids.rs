//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are integers assigned by the backend. Newtype wrappers keep a goal ID
//! from being passed where a transaction ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            /// Accepts both "12" and the display form "txn-12"
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(RecurringId, "fix-");
define_id!(GoalId, "goal-");
define_id!(DepositId, "dep-");
define_id!(UserId, "usr-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(TransactionId::new(42).to_string(), "txn-42");
        assert_eq!(GoalId::new(3).to_string(), "goal-3");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("17".parse::<RecurringId>().unwrap(), RecurringId::new(17));
        assert_eq!("fix-17".parse::<RecurringId>().unwrap(), RecurringId::new(17));
        assert!("goal-x".parse::<GoalId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = DepositId::new(9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9");
        let deserialized: DepositId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
