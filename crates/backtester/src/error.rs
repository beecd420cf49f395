// In crates/backtester/src/error.rs

use thiserror::Error;

/// Everything the backtest panel can report: bad input, caught before the
/// service is contacted, or a failed execution.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] core_types::Error),

    #[error(transparent)]
    Execution(#[from] api_client::Error),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Invalid(e) if e.is_validation())
    }

    pub fn user_message(&self) -> String {
        match self {
            Error::Invalid(e) => e.to_string(),
            Error::Execution(e) => e.user_message(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
