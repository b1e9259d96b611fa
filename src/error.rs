//! Custom error types for fintrack
//!
//! Every fallible operation in the crate returns [`FinResult`]. The variants
//! fall into three user-facing classes: authentication failures (which end the
//! session), validation failures (raised before any backend call), and
//! transport failures (the backend could not complete the request).

use thiserror::Error;

/// The main error type for fintrack operations
#[derive(Error, Debug)]
pub enum FinError {
    /// Missing, invalid or expired credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Input rejected before reaching the backend
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend call failed or timed out
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl FinError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for recurring expenses
    pub fn recurring_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recurring expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goal deposits
    pub fn deposit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Deposit",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error must end the current session
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if the backend failed to complete the request
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::NotFound { .. }
                | Self::Storage(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }
}

impl From<std::io::Error> for FinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for fintrack operations
pub type FinResult<T> = Result<T, FinError>;
