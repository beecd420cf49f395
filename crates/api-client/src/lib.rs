// In crates/api-client/src/lib.rs

use app_config::types::ServiceSettings;
use core_types::{BacktestRequest, BacktestResult};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub mod error;
pub mod session;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use session::Session;
pub use types::*;

/// Shown when a failed backtest response carries no readable message.
pub const BACKTEST_FALLBACK_MESSAGE: &str = "Failed to run backtest";
const TEMPLATES_FALLBACK_MESSAGE: &str = "Failed to get templates";

const RUN_PATH: &str = "/api/backtest/run";
const TEMPLATES_PATH: &str = "/api/backtest/templates";

/// Holds the client's in-flight flag for the lifetime of one request and
/// releases it on every exit path, including cancellation.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BacktestClient {
    /// Constructs a new client from the service settings.
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(BacktestClient {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    /// True while a `run_backtest` call on this client (or a clone) is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submits a backtest and waits for its result.
    ///
    /// This corresponds to the `POST /api/backtest/run` endpoint.
    ///
    /// # Arguments
    ///
    /// * `request`: A validated request, sent as-is.
    ///
    /// # Returns
    ///
    /// The decoded result once it has passed its consistency checks. Only one
    /// request runs at a time; a second call while one is pending returns
    /// `Error::Busy` without touching the network.
    pub async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let url = format!("{}{RUN_PATH}", self.base_url);
        tracing::debug!(
            strategy_type = %request.strategy_type,
            symbols = request.symbols.len(),
            "Submitting backtest request."
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Error::Transport)?;

        let result: BacktestResult = decode(response, RUN_PATH, BACKTEST_FALLBACK_MESSAGE).await?;
        result.validate().map_err(|e| match e {
            core_types::Error::InconsistentResult(reason) => Error::InconsistentResult(reason),
            other => Error::InconsistentResult(other.to_string()),
        })?;

        tracing::debug!(
            total_trades = result.total_trades,
            points = result.equity_curve.len(),
            "Backtest result accepted."
        );
        Ok(result)
    }

    /// Fetches the strategy templates the service offers.
    ///
    /// This corresponds to the `GET /api/backtest/templates` endpoint.
    pub async fn get_templates(&self) -> Result<Vec<RemoteTemplate>> {
        let url = format!("{}{TEMPLATES_PATH}", self.base_url);
        let response = self.http_client.get(&url).send().await.map_err(Error::Transport)?;
        let payload: TemplatesResponse = decode(response, TEMPLATES_PATH, TEMPLATES_FALLBACK_MESSAGE).await?;
        Ok(payload.templates)
    }
}

/// Turns a response from `endpoint` into `T`, or into `Error::Service` for
/// non-success statuses.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str, fallback: &str) -> Result<T> {
    let status = response.status();
    let text = response.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        let err = service_error(status, &text, fallback);
        tracing::warn!(endpoint, status = status.as_u16(), message = %err, "Service call failed.");
        return Err(err);
    }
    serde_json::from_str(&text).map_err(Error::DeserializationFailed)
}

fn service_error(status: StatusCode, body: &str, fallback: &str) -> Error {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.text())
        .unwrap_or_else(|| fallback.to_string());
    Error::Service { status: status.as_u16(), message }
}
