//! Expense category catalog
//!
//! One shared, immutable table mapping a category key to its display label
//! and chart color. Expenses must reference one of these keys.

use std::fmt;

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    /// Hex RGB color, e.g. "#0EA5E9"
    pub color: &'static str,
}

impl Category {
    /// Parse the hex color into RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.color.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Key used when an expense arrives without a category
pub const DEFAULT_CATEGORY: &str = "other";

/// All expense categories, in display order
pub const CATALOG: &[Category] = &[
    Category { key: "food", label: "Groceries", color: "#0EA5E9" },
    Category { key: "transport", label: "Transport", color: "#F97316" },
    Category { key: "entertainment", label: "Entertainment", color: "#8B5CF6" },
    Category { key: "health", label: "Health", color: "#10B981" },
    Category { key: "utilities", label: "Utilities", color: "#F59E0B" },
    Category { key: "children", label: "Children", color: "#EC4899" },
    Category { key: "taxes", label: "Taxes", color: "#EF4444" },
    Category { key: "marketplace", label: "Marketplaces", color: "#06B6D4" },
    Category { key: "services", label: "Services", color: "#14B8A6" },
    Category { key: "restaurants", label: "Cafes & Restaurants", color: "#F59E0B" },
    Category { key: "other", label: "Other", color: "#8E9196" },
];

/// Look up a category by key
pub fn find(key: &str) -> Option<&'static Category> {
    CATALOG.iter().find(|c| c.key == key)
}

/// Display label for a key; unknown keys are shown as-is
pub fn label_for(key: &str) -> &str {
    find(key).map(|c| c.label).unwrap_or(key)
}

/// Comma-separated list of valid keys, for error messages
pub fn keys() -> String {
    CATALOG.iter().map(|c| c.key).collect::<Vec<_>>().join(", ")
}
