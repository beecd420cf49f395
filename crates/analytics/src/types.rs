// In crates/analytics/src/types.rs

use serde::Serialize;
use std::fmt;

/// How a metric should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Positive for zero and above, negative below.
    pub fn of_sign(value: f64) -> Self {
        if value >= 0.0 { Tone::Positive } else { Tone::Negative }
    }
}

/// One formatted entry of the results summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

impl fmt::Display for MetricView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16}{:>14}", self.label, self.value)
    }
}

/// A point of the equity chart series: unix seconds (fractional) and
/// portfolio value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: f64,
    pub value: f64,
}
