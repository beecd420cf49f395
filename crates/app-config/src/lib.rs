// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;
use strategies::StrategyBlueprint;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, BacktestSettings, BrokerSettings, ServiceSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Built-in defaults, so the application runs without any file.
/// 2. An optional `base.toml` in `dir`.
/// 3. An optional environment-specific file (e.g., `development.toml`).
/// 4. Environment variables (e.g., `APP__SERVICE__BASE_URL=...`).
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .set_default("app.environment", environment)?
        .set_default("app.log_level", "info")?
        .set_default("service.base_url", "http://localhost:8765")?
        .set_default("service.timeout_secs", 120)?
        .set_default("backtest.strategy_type", "momentum_breakout")?
        .set_default("backtest.initial_capital", 100_000.0)?
        .set_default("backtest.lookback_days", 365)?
        .add_source(File::from(dir.join("base")).required(false))
        .add_source(File::from(dir.join(environment)).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.service.base_url.trim().is_empty() {
        return Err(Error::InvalidSetting { key: "service.base_url", reason: "must not be empty".into() });
    }
    if settings.service.timeout_secs == 0 {
        return Err(Error::InvalidSetting { key: "service.timeout_secs", reason: "must be at least 1".into() });
    }
    let capital = settings.backtest.initial_capital;
    if !capital.is_finite() || capital <= 0.0 {
        return Err(Error::InvalidSetting {
            key: "backtest.initial_capital",
            reason: format!("must be a positive amount, got {capital}"),
        });
    }
    Ok(())
}

/// Loads a strategy blueprint (a block list described in TOML).
pub fn load_blueprint(path: &Path) -> Result<StrategyBlueprint> {
    let content = std::fs::read_to_string(path)?;

    let blueprint: StrategyBlueprint = toml::from_str(&content)?;
    Ok(blueprint)
}
