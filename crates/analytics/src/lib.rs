// In crates/analytics/src/lib.rs

pub mod types;
pub mod views;

pub use types::{ChartPoint, MetricView, Tone};
pub use views::{ResultView, equity_series, summary_metrics};
