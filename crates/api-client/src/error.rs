// In crates/api-client/src/error.rs

use thiserror::Error;

/// Everything that can go wrong between submitting a request and holding a
/// usable result. Every variant is a backtest execution failure; `Transport`
/// is the network-level subset.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),

    /// The service could not be reached, or the connection failed or timed out.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),

    /// The service answered, but the result breaks its own invariants.
    #[error("Backtest result rejected: {0}")]
    InconsistentResult(String),

    /// A request is already in flight on this client.
    #[error("A backtest is already running")]
    Busy,

    #[error("Login rejected: {0}")]
    Unauthorized(String),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// The text shown to the user in an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport(_) => "Could not reach the backtest service. Please try again.".to_string(),
            Error::DeserializationFailed(_) => "Backtest failed: the service sent an unreadable response.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
