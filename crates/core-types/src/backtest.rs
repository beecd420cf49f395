// In crates/core-types/src/backtest.rs

use crate::error::{Error, Result};
use crate::strategy::StrategySpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A ticker symbol, e.g. "SPY".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// A single strategy parameter value.
///
/// Serialized untagged so the service sees plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(v) => Some(*v as f64),
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Flag(v) => write!(f, "{v}"),
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

impl FromStr for ParamValue {
    type Err = std::convert::Infallible;

    /// Reads a command-line style value: booleans, then integers, then
    /// floats, falling back to text.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(v) = s.parse::<bool>() {
            return Ok(ParamValue::Flag(v));
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(ParamValue::Integer(v));
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(ParamValue::Number(v)),
            _ => Ok(ParamValue::Text(s.to_string())),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Strategy parameters keyed by name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A normalized request for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    /// A template id such as `momentum_breakout`, or `custom`.
    pub strategy_type: String,
    pub symbols: Vec<Symbol>,
    pub parameters: Parameters,
    #[serde(with = "crate::time::lenient")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::time::lenient")]
    pub end_date: DateTime<Utc>,
    pub initial_capital: f64,
    /// The compiled block strategy, present only for custom strategies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategySpec>,
}

impl BacktestRequest {
    /// Checks the request invariants: a non-empty symbol list of non-blank
    /// tokens, a forward date range and a positive capital.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::validation("symbols", "at least one symbol is required"));
        }
        if let Some(blank) = self.symbols.iter().position(|s| s.0.trim().is_empty()) {
            return Err(Error::validation("symbols", format!("symbol #{} is blank", blank + 1)));
        }
        if self.start_date >= self.end_date {
            return Err(Error::validation("date range", "start date must be before end date"));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(Error::validation("initial capital", "must be a positive amount"));
        }
        Ok(())
    }
}

/// One snapshot of portfolio value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    #[serde(with = "crate::time::lenient")]
    pub date: DateTime<Utc>,
    pub equity: f64,
    #[serde(default, alias = "profit_loss")]
    pub profit_loss: f64,
    #[serde(default, alias = "profit_loss_pct")]
    pub profit_loss_pct: f64,
}

/// The performance report returned by the backtest service for one request.
///
/// Field names follow the service contract in camelCase; the snake_case
/// spelling is accepted on input too. The trade breakdown fields default to
/// zero because not every service version reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    #[serde(alias = "total_return")]
    pub total_return: f64,
    #[serde(default, alias = "buy_and_hold_return")]
    pub buy_and_hold_return: f64,
    #[serde(alias = "max_drawdown")]
    pub max_drawdown: f64,
    #[serde(alias = "sharpe_ratio")]
    pub sharpe_ratio: f64,
    #[serde(alias = "win_rate")]
    pub win_rate: f64,
    #[serde(alias = "total_trades")]
    pub total_trades: u32,
    #[serde(default, alias = "winning_trades")]
    pub winning_trades: u32,
    #[serde(default, alias = "losing_trades")]
    pub losing_trades: u32,
    #[serde(default, alias = "avg_win")]
    pub avg_win: f64,
    #[serde(default, alias = "avg_loss")]
    pub avg_loss: f64,
    #[serde(default, alias = "avg_trade_duration_days")]
    pub avg_trade_duration_days: f64,
    #[serde(default, alias = "max_consecutive_wins")]
    pub max_consecutive_wins: u32,
    #[serde(default, alias = "max_consecutive_losses")]
    pub max_consecutive_losses: u32,
    #[serde(alias = "equity_curve")]
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    /// Re-checks the invariants the service is expected to uphold.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("totalReturn", self.total_return),
            ("buyAndHoldReturn", self.buy_and_hold_return),
            ("maxDrawdown", self.max_drawdown),
            ("sharpeRatio", self.sharpe_ratio),
            ("winRate", self.win_rate),
            ("avgWin", self.avg_win),
            ("avgLoss", self.avg_loss),
            ("avgTradeDurationDays", self.avg_trade_duration_days),
        ];
        if let Some((name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InconsistentResult(format!("{name} is not a finite number ({value})")));
        }

        let decided = u64::from(self.winning_trades) + u64::from(self.losing_trades);
        if decided > u64::from(self.total_trades) {
            return Err(Error::InconsistentResult(format!(
                "winning ({}) + losing ({}) trades exceed total trades ({})",
                self.winning_trades, self.losing_trades, self.total_trades
            )));
        }

        if self.total_trades > 0 && self.equity_curve.is_empty() {
            return Err(Error::InconsistentResult(format!(
                "{} trades reported but the equity curve is empty",
                self.total_trades
            )));
        }

        validate_equity_curve(&self.equity_curve)
    }
}

/// Checks that an equity curve is strictly ascending by date and holds only
/// finite equity values.
pub fn validate_equity_curve(curve: &[EquityPoint]) -> Result<()> {
    if let Some(i) = curve.iter().position(|p| !p.equity.is_finite()) {
        return Err(Error::InconsistentResult(format!("equity point #{} has a non-finite value", i + 1)));
    }
    if let Some(i) = curve.windows(2).position(|w| w[0].date >= w[1].date) {
        return Err(Error::InconsistentResult(format!(
            "equity curve is not strictly ascending at point #{} ({} >= {})",
            i + 2,
            curve[i].date,
            curve[i + 1].date
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(day: u32, equity: f64) -> EquityPoint {
        EquityPoint {
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            equity,
            profit_loss: equity - 100_000.0,
            profit_loss_pct: (equity - 100_000.0) / 1_000.0,
        }
    }

    fn result(total: u32, wins: u32, losses: u32) -> BacktestResult {
        BacktestResult {
            total_return: 12.5,
            buy_and_hold_return: 8.75,
            max_drawdown: -18.5,
            sharpe_ratio: 1.2,
            win_rate: 60.0,
            total_trades: total,
            winning_trades: wins,
            losing_trades: losses,
            avg_win: 420.0,
            avg_loss: -210.0,
            avg_trade_duration_days: 12.0,
            max_consecutive_wins: 3,
            max_consecutive_losses: 2,
            equity_curve: vec![point(1, 100_000.0), point(8, 100_500.0), point(15, 101_002.5)],
        }
    }

    #[test]
    fn consistent_trade_counts_pass() {
        assert!(result(10, 6, 4).validate().is_ok());
        assert!(result(10, 5, 4).validate().is_ok());
    }

    #[test]
    fn over_counted_trades_are_rejected() {
        let err = result(10, 7, 4).validate().unwrap_err();
        assert!(matches!(err, Error::InconsistentResult(ref msg) if msg.contains("exceed")));
    }

    #[test]
    fn trades_without_a_curve_are_rejected() {
        let mut r = result(3, 2, 1);
        r.equity_curve.clear();
        assert!(r.validate().is_err());

        let mut idle = result(0, 0, 0);
        idle.equity_curve.clear();
        assert!(idle.validate().is_ok());
    }

    #[test]
    fn unsorted_or_duplicate_dates_are_rejected() {
        let mut r = result(10, 6, 4);
        r.equity_curve.swap(0, 1);
        assert!(r.validate().is_err());

        let mut dup = result(10, 6, 4);
        dup.equity_curve[1].date = dup.equity_curve[0].date;
        assert!(dup.validate().is_err());
    }

    #[test]
    fn non_finite_metrics_are_rejected() {
        let mut r = result(10, 6, 4);
        r.sharpe_ratio = f64::INFINITY;
        assert!(r.validate().is_err());

        let mut e = result(10, 6, 4);
        e.equity_curve[2].equity = f64::NAN;
        assert!(e.validate().is_err());
    }

    #[test]
    fn request_serializes_with_camel_case_and_iso_dates() {
        let request = BacktestRequest {
            strategy_type: "momentum_breakout".into(),
            symbols: vec!["SPY".into()],
            parameters: Parameters::from([("lookback_period".to_string(), ParamValue::Integer(20))]),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            initial_capital: 100_000.0,
            strategy: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "strategyType": "momentum_breakout",
                "symbols": ["SPY"],
                "parameters": {"lookback_period": 20},
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2025-01-01T00:00:00Z",
                "initialCapital": 100000.0
            })
        );
    }

    #[test]
    fn result_accepts_snake_case_payload_with_missing_breakdown() {
        let json = serde_json::json!({
            "total_return": 27.0,
            "buy_and_hold_return": 18.9,
            "max_drawdown": -18.5,
            "win_rate": 58.0,
            "total_trades": 47,
            "avg_trade_duration_days": 12.0,
            "sharpe_ratio": 1.2,
            "equity_curve": [
                {"date": "2024-01-01T00:00:00", "equity": 100500.0, "profit_loss": 500.0, "profit_loss_pct": 0.5},
                {"date": "2024-01-08T00:00:00+00:00", "equity": 101002.5, "profit_loss": 1002.5, "profit_loss_pct": 1.0025}
            ]
        });
        let parsed: BacktestResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.total_trades, 47);
        assert_eq!(parsed.winning_trades, 0);
        assert_eq!(parsed.equity_curve.len(), 2);
        assert_eq!(parsed.equity_curve[1].profit_loss, 1002.5);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn result_requires_core_metrics() {
        let json = serde_json::json!({"totalReturn": 1.0, "equityCurve": []});
        assert!(serde_json::from_value::<BacktestResult>(json).is_err());
    }

    #[test]
    fn param_values_parse_from_cli_text() {
        assert_eq!("20".parse::<ParamValue>().unwrap(), ParamValue::Integer(20));
        assert_eq!("1.5".parse::<ParamValue>().unwrap(), ParamValue::Number(1.5));
        assert_eq!("true".parse::<ParamValue>().unwrap(), ParamValue::Flag(true));
        assert_eq!("daily".parse::<ParamValue>().unwrap(), ParamValue::Text("daily".into()));
        assert_eq!(ParamValue::Integer(5).as_f64(), Some(5.0));
    }
}
