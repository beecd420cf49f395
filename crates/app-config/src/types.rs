// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where the backtest service lives.
    pub service: ServiceSettings,
    /// Defaults for the backtest panel form.
    pub backtest: BacktestSettings,
    /// Brokerage credentials. Without them no session is opened.
    #[serde(default)]
    pub broker: Option<BrokerSettings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServiceSettings {
    /// Base URL of the backtest service, e.g. `http://localhost:8765`.
    pub base_url: String,
    /// Request timeout. A timed-out request surfaces as a transport failure.
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BacktestSettings {
    /// Template preselected when no strategy is given.
    pub strategy_type: String,
    pub initial_capital: f64,
    /// How far back the default start date lies.
    pub lookback_days: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BrokerSettings {
    pub api_key_id: String,
    pub secret_key: String,
    #[serde(default = "default_paper")]
    pub paper: bool,
}

fn default_paper() -> bool { true }
