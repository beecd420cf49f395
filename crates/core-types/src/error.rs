// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed or incomplete user input. `field` names the offending input
    /// so a front end can attach the message to it.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A backtest result that breaks one of its own invariants.
    #[error("Inconsistent backtest result: {0}")]
    InconsistentResult(String),
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation { field, reason: reason.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
