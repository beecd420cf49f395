// In crates/backtester/src/lib.rs

pub mod error;
pub mod panel;
pub mod request;

pub use error::{Error, Result};
pub use panel::{BacktestPanel, BacktestService, PanelState};
pub use request::{CUSTOM_STRATEGY_TYPE, DEFAULT_INITIAL_CAPITAL, RequestBuilder, StrategySource, build, parse_symbols};
