//! Dashboard error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Provider failure, unknown ticker or an empty response.
    #[error("data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("insufficient history: required {required} observations, got {got}")]
    InsufficientHistory { required: usize, got: usize },

    #[error("invalid setting {name}={value}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown country: {0}")]
    UnknownCountry(String),

    #[error("calendar error: {0}")]
    Calendar(String),
}

impl DashboardError {
    pub fn unavailable(symbol: &str, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
