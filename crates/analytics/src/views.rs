// In crates/analytics/src/views.rs

use crate::types::{ChartPoint, MetricView, Tone};
use core_types::backtest::validate_equity_curve;
use core_types::{BacktestResult, EquityPoint, Error, Result};
use std::fmt;

fn metric(label: &'static str, value: String, tone: Tone) -> MetricView {
    MetricView { label, value, tone }
}

/// The summary widgets for a result, in display order.
///
/// Only formats and classifies; every number comes straight from the result.
pub fn summary_metrics(result: &BacktestResult) -> Vec<MetricView> {
    vec![
        metric("Total Return", format!("{:.2}%", result.total_return), Tone::of_sign(result.total_return)),
        metric("Buy & Hold", format!("{:.2}%", result.buy_and_hold_return), Tone::of_sign(result.buy_and_hold_return)),
        metric("Max Drawdown", format!("{:.2}%", result.max_drawdown), Tone::Negative),
        metric("Sharpe Ratio", format!("{:.2}", result.sharpe_ratio), Tone::Neutral),
        metric("Win Rate", format!("{:.1}%", result.win_rate), Tone::Neutral),
        metric("Total Trades", result.total_trades.to_string(), Tone::Neutral),
        metric("Winning Trades", result.winning_trades.to_string(), Tone::Positive),
        metric("Losing Trades", result.losing_trades.to_string(), Tone::Negative),
        metric("Avg Win", format!("${:.2}", result.avg_win), Tone::Positive),
        metric("Avg Loss", format!("${:.2}", result.avg_loss), Tone::Negative),
        metric("Avg Duration", format!("{:.1} days", result.avg_trade_duration_days), Tone::Neutral),
        metric(
            "Max Streak",
            format!("{}W / {}L", result.max_consecutive_wins, result.max_consecutive_losses),
            Tone::Neutral,
        ),
    ]
}

/// Reshapes an equity curve for the chart.
///
/// Points keep their order and times are fractional unix seconds. A curve
/// that is not strictly ascending by date, or holds a non-finite equity
/// value, is an inconsistent result. So is a curve whose dates are too close
/// to stay distinct at microsecond resolution.
pub fn equity_series(curve: &[EquityPoint]) -> Result<Vec<ChartPoint>> {
    validate_equity_curve(curve)?;
    let series: Vec<ChartPoint> = curve
        .iter()
        .map(|p| ChartPoint { time: p.date.timestamp_micros() as f64 / 1_000_000.0, value: p.equity })
        .collect();

    if let Some(i) = series.windows(2).position(|w| w[0].time >= w[1].time) {
        return Err(Error::InconsistentResult(format!(
            "equity points #{} and #{} share chart time {}",
            i + 1,
            i + 2,
            series[i].time
        )));
    }
    Ok(series)
}

/// Everything the results panel shows for one backtest.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub metrics: Vec<MetricView>,
    pub series: Vec<ChartPoint>,
}

impl ResultView {
    pub fn new(result: &BacktestResult) -> Result<Self> {
        Ok(Self {
            metrics: summary_metrics(result),
            series: equity_series(&result.equity_curve)?,
        })
    }

    pub fn metric(&self, label: &str) -> Option<&MetricView> {
        self.metrics.iter().find(|m| m.label == label)
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.metrics {
            writeln!(f, "{m}")?;
        }
        write!(f, "{} equity points", self.series.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(day: u32, equity: f64) -> EquityPoint {
        EquityPoint {
            date: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            equity,
            profit_loss: 0.0,
            profit_loss_pct: 0.0,
        }
    }

    fn sample() -> BacktestResult {
        BacktestResult {
            total_return: -3.456,
            buy_and_hold_return: 8.0,
            max_drawdown: -12.345,
            sharpe_ratio: 0.876,
            win_rate: 41.66,
            total_trades: 12,
            winning_trades: 5,
            losing_trades: 7,
            avg_win: 512.5,
            avg_loss: -230.1,
            avg_trade_duration_days: 3.26,
            max_consecutive_wins: 2,
            max_consecutive_losses: 4,
            equity_curve: vec![point(1, 100_000.0), point(2, 98_000.0), point(3, 96_544.0)],
        }
    }

    #[test]
    fn formats_and_tones_follow_the_summary_table() {
        let view = ResultView::new(&sample()).unwrap();

        let total = view.metric("Total Return").unwrap();
        assert_eq!(total.value, "-3.46%");
        assert_eq!(total.tone, Tone::Negative);

        let hold = view.metric("Buy & Hold").unwrap();
        assert_eq!((hold.value.as_str(), hold.tone), ("8.00%", Tone::Positive));

        assert_eq!(view.metric("Max Drawdown").unwrap().tone, Tone::Negative);
        assert_eq!(view.metric("Sharpe Ratio").unwrap().value, "0.88");
        assert_eq!(view.metric("Win Rate").unwrap().value, "41.7%");
        assert_eq!(view.metric("Total Trades").unwrap().value, "12");
        assert_eq!(view.metric("Avg Win").unwrap().value, "$512.50");
        assert_eq!(view.metric("Avg Loss").unwrap().value, "$-230.10");
        assert_eq!(view.metric("Avg Duration").unwrap().value, "3.3 days");
        assert_eq!(view.metric("Max Streak").unwrap().value, "2W / 4L");
        assert_eq!(view.metrics.len(), 12);
    }

    #[test]
    fn zero_return_is_positive() {
        assert_eq!(Tone::of_sign(0.0), Tone::Positive);
    }

    #[test]
    fn series_keeps_order_and_uses_unix_seconds() {
        let series = equity_series(&sample().equity_curve).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], ChartPoint { time: 1_709_251_200.0, value: 100_000.0 });
        assert!(series.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn unsorted_or_nan_curves_are_refused() {
        assert!(equity_series(&[point(2, 1.0), point(1, 1.0)]).is_err());
        assert!(equity_series(&[point(1, 1.0), point(1, 2.0)]).is_err());
        assert!(equity_series(&[point(1, f64::NAN)]).is_err());
        assert!(equity_series(&[]).unwrap().is_empty());
    }

    #[test]
    fn chart_point_wire_shape() {
        let json = serde_json::to_value(ChartPoint { time: 10.5, value: 1.5 }).unwrap();
        assert_eq!(json, serde_json::json!({"time": 10.5, "value": 1.5}));
    }

    #[test]
    fn sub_second_points_keep_distinct_times() {
        let at = |raw: &str| EquityPoint {
            date: core_types::time::parse_timestamp(raw).unwrap(),
            equity: 100_000.0,
            profit_loss: 0.0,
            profit_loss_pct: 0.0,
        };
        let mut result = sample();
        result.equity_curve = vec![at("2024-03-10T12:00:00.250"), at("2024-03-10T12:00:00.750")];
        assert!(result.validate().is_ok());

        let view = ResultView::new(&result).unwrap();
        assert_eq!(view.series[0].time, 1_710_072_000.25);
        assert_eq!(view.series[1].time, 1_710_072_000.75);
        assert!(view.series[0].time < view.series[1].time);
    }

    #[test]
    fn nanosecond_neighbours_are_refused() {
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let curve = vec![
            EquityPoint { date: base, equity: 1.0, profit_loss: 0.0, profit_loss_pct: 0.0 },
            EquityPoint {
                date: base + chrono::Duration::nanoseconds(10),
                equity: 1.0,
                profit_loss: 0.0,
                profit_loss_pct: 0.0,
            },
        ];
        let err = equity_series(&curve).unwrap_err();
        assert!(matches!(err, Error::InconsistentResult(_)));
    }
}
