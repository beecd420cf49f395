// In crates/backtester/src/panel.rs

use crate::error::{Error, Result};
use api_client::BacktestClient;
use async_trait::async_trait;
use core_types::{BacktestRequest, BacktestResult};

/// Anything that can execute a backtest request.
///
/// The panel only needs this one call, so tests can drive it without a
/// running service.
#[async_trait]
pub trait BacktestService: Send + Sync {
    async fn run_backtest(&self, request: &BacktestRequest) -> api_client::Result<BacktestResult>;
}

#[async_trait]
impl BacktestService for BacktestClient {
    async fn run_backtest(&self, request: &BacktestRequest) -> api_client::Result<BacktestResult> {
        BacktestClient::run_backtest(self, request).await
    }
}

/// Where a backtest panel is in its submit cycle.
#[derive(Debug, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Running,
    Success(BacktestResult),
    Failed(api_client::Error),
}

impl PanelState {
    pub fn name(&self) -> &'static str {
        match self {
            PanelState::Idle => "idle",
            PanelState::Running => "running",
            PanelState::Success(_) => "success",
            PanelState::Failed(_) => "failed",
        }
    }
}

/// The controller behind one backtest panel.
///
/// Holds at most one result. A new submit discards the previous result or
/// error before the request goes out.
pub struct BacktestPanel<S: BacktestService> {
    service: S,
    state: PanelState,
}

impl<S: BacktestService> BacktestPanel<S> {
    pub fn new(service: S) -> Self {
        Self { service, state: PanelState::Idle }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PanelState::Running)
    }

    pub fn result(&self) -> Option<&BacktestResult> {
        match &self.state {
            PanelState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&api_client::Error> {
        match &self.state {
            PanelState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Moves the panel to `Running` for `request`.
    ///
    /// Fails without touching the state when a run is already pending or the
    /// request does not validate.
    pub fn begin(&mut self, request: &BacktestRequest) -> Result<()> {
        if self.is_running() {
            return Err(Error::Execution(api_client::Error::Busy));
        }
        request.validate()?;

        tracing::info!(
            from = self.state.name(),
            strategy_type = %request.strategy_type,
            symbols = ?request.symbols.iter().map(|s| s.0.as_str()).collect::<Vec<_>>(),
            "Backtest started."
        );
        self.state = PanelState::Running;
        Ok(())
    }

    /// Records the outcome of the pending run. Ignored unless `Running`.
    pub fn complete(&mut self, outcome: api_client::Result<BacktestResult>) -> &PanelState {
        if !self.is_running() {
            tracing::warn!(state = self.state.name(), "Dropping a backtest outcome with no run pending.");
            return &self.state;
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    total_return = result.total_return,
                    total_trades = result.total_trades,
                    "Backtest succeeded."
                );
                PanelState::Success(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "Backtest failed.");
                PanelState::Failed(e)
            }
        };
        &self.state
    }

    /// Runs one full submit cycle: `begin`, the service call, `complete`.
    ///
    /// # Returns
    ///
    /// The terminal state (`Success` or `Failed`). An `Err` means the submit
    /// was refused before the service was contacted.
    pub async fn submit(&mut self, request: &BacktestRequest) -> Result<&PanelState> {
        self.begin(request)?;
        let outcome = self.service.run_backtest(request).await;
        Ok(self.complete(outcome))
    }
}
