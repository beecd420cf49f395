// In crates/core-types/src/lib.rs

pub mod backtest;
pub mod block;
pub mod error;
pub mod strategy;
pub mod time;

// Re-export the most important types for easy access from other crates.
pub use backtest::{BacktestRequest, BacktestResult, EquityPoint, ParamValue, Parameters, Symbol};
pub use block::{Block, BlockConfig, BlockId, BlockKind, PALETTE, PaletteEntry};
pub use error::{Error, Result};
pub use strategy::{BlockDescriptor, DEFAULT_STRATEGY_NAME, StrategySpec};
