// In crates/backtester/src/request.rs

use chrono::{DateTime, Utc};
use core_types::time::parse_timestamp;
use core_types::{BacktestRequest, Error, Parameters, Result, StrategySpec, Symbol};
use strategies::TemplateCatalog;

/// Used when the caller leaves the capital field empty.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// `strategyType` sent alongside a compiled block strategy.
pub const CUSTOM_STRATEGY_TYPE: &str = "custom";

/// What the backtest should run: a service-side template or a compiled
/// block strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategySource {
    Template(String),
    Custom(StrategySpec),
}

impl StrategySource {
    pub fn strategy_type(&self) -> &str {
        match self {
            StrategySource::Template(id) => id,
            StrategySource::Custom(_) => CUSTOM_STRATEGY_TYPE,
        }
    }
}

impl From<&str> for StrategySource {
    fn from(id: &str) -> Self {
        StrategySource::Template(id.to_string())
    }
}

impl From<StrategySpec> for StrategySource {
    fn from(spec: StrategySpec) -> Self {
        StrategySource::Custom(spec)
    }
}

/// Turns raw panel form input into a validated [`BacktestRequest`].
///
/// The builder only reads its template catalog; building never mutates
/// anything.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    catalog: TemplateCatalog,
}

impl RequestBuilder {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Builds a request with the template's default parameters.
    ///
    /// # Arguments
    ///
    /// * `source`: A template id or a compiled custom strategy.
    /// * `raw_symbols`: Comma-delimited tickers, e.g. `" SPY, qqq ,IWM "`.
    /// * `start_date` / `end_date`: `YYYY-MM-DD` or RFC 3339.
    /// * `initial_capital`: Defaults to [`DEFAULT_INITIAL_CAPITAL`] when `None`.
    pub fn build(
        &self,
        source: impl Into<StrategySource>,
        raw_symbols: &str,
        start_date: &str,
        end_date: &str,
        initial_capital: Option<f64>,
    ) -> Result<BacktestRequest> {
        self.build_with_overrides(source, raw_symbols, start_date, end_date, initial_capital, &Parameters::new())
    }

    /// Like [`RequestBuilder::build`], with `overrides` layered over the
    /// template defaults.
    pub fn build_with_overrides(
        &self,
        source: impl Into<StrategySource>,
        raw_symbols: &str,
        start_date: &str,
        end_date: &str,
        initial_capital: Option<f64>,
        overrides: &Parameters,
    ) -> Result<BacktestRequest> {
        let source = source.into();

        // 1. Symbols
        let symbols = parse_symbols(raw_symbols)?;

        // 2. Parameters
        let mut parameters = match &source {
            StrategySource::Template(id) => self.catalog.default_parameters(id),
            StrategySource::Custom(_) => Parameters::new(),
        };
        parameters.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        // 3. Dates
        let (start_date, end_date) = parse_date_range(start_date, end_date)?;

        // 4. Capital
        let initial_capital = match initial_capital {
            None => DEFAULT_INITIAL_CAPITAL,
            Some(c) if c.is_finite() && c > 0.0 => c,
            Some(c) => return Err(Error::validation("initial capital", format!("must be a positive amount, got {c}"))),
        };

        let strategy_type = source.strategy_type().to_string();
        let strategy = match source {
            StrategySource::Custom(spec) => Some(spec),
            StrategySource::Template(_) => None,
        };

        Ok(BacktestRequest {
            strategy_type,
            symbols,
            parameters,
            start_date,
            end_date,
            initial_capital,
            strategy,
        })
    }
}

/// [`RequestBuilder::build`] against the built-in template table.
pub fn build(
    strategy_type: &str,
    raw_symbols: &str,
    start_date: &str,
    end_date: &str,
    initial_capital: Option<f64>,
) -> Result<BacktestRequest> {
    RequestBuilder::default().build(strategy_type, raw_symbols, start_date, end_date, initial_capital)
}

/// Splits a comma-delimited ticker list, trimming each token and dropping
/// empty ones. Order and duplicates are kept.
pub fn parse_symbols(raw: &str) -> Result<Vec<Symbol>> {
    let symbols: Vec<Symbol> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Symbol::from)
        .collect();

    if symbols.is_empty() {
        return Err(Error::validation("symbols", "enter at least one symbol"));
    }
    Ok(symbols)
}

fn parse_date_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = parse_timestamp(start)
        .ok_or_else(|| Error::validation("start date", format!("'{}' is not a date", start.trim())))?;
    let end_date = parse_timestamp(end)
        .ok_or_else(|| Error::validation("end date", format!("'{}' is not a date", end.trim())))?;

    if start_date >= end_date {
        return Err(Error::validation("date range", "start date must be before end date"));
    }
    Ok((start_date, end_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::{BlockConfig, BlockDescriptor, BlockId, BlockKind, DEFAULT_STRATEGY_NAME, ParamValue};

    #[test]
    fn momentum_breakout_request() {
        let request = build("momentum_breakout", " SPY, qqq ,IWM ", "2024-01-01", "2025-01-01", Some(100_000.0)).unwrap();

        let symbols: Vec<_> = request.symbols.iter().map(|s| s.0.as_str()).collect();
        assert_eq!(symbols, vec!["SPY", "qqq", "IWM"]);
        assert_eq!(request.initial_capital, 100_000.0);
        assert_eq!(request.strategy_type, "momentum_breakout");
        assert_eq!(request.parameters["lookback_period"], ParamValue::Integer(20));
        assert_eq!(request.parameters["volume_multiplier"], ParamValue::Number(1.5));
        assert_eq!(request.parameters["position_size_pct"], ParamValue::Integer(10));
        assert_eq!(request.parameters["stop_loss_pct"], ParamValue::Integer(5));
        assert_eq!(request.parameters["take_profit_pct"], ParamValue::Integer(15));
        assert_eq!(request.parameters["max_positions"], ParamValue::Integer(5));
        assert_eq!(request.start_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(request.strategy.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_symbols_are_rejected() {
        for raw in ["", "   ", ", ,,", " ,\t, "] {
            let err = build("x", raw, "2024-01-01", "2025-01-01", Some(100_000.0)).unwrap_err();
            assert!(matches!(err, Error::Validation { field: "symbols", .. }), "{raw:?}: {err}");
        }
    }

    #[test]
    fn inverted_or_empty_range_is_rejected() {
        let err = build("x", "SPY", "2025-01-01", "2024-01-01", Some(100_000.0)).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "date range", .. }));
        assert!(build("x", "SPY", "2024-01-01", "2024-01-01", None).is_err());
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let err = build("x", "SPY", "01/02/2024", "2025-01-01", None).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "start date", .. }));
        let err = build("x", "SPY", "2024-01-01", "", None).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "end date", .. }));
    }

    #[test]
    fn unknown_type_gets_empty_parameters() {
        let request = build("pairs_trading", "SPY", "2024-01-01", "2025-01-01", None).unwrap();
        assert!(request.parameters.is_empty());
        assert_eq!(request.initial_capital, DEFAULT_INITIAL_CAPITAL);
    }

    #[test]
    fn capital_must_be_positive() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = build("x", "SPY", "2024-01-01", "2025-01-01", Some(bad)).unwrap_err();
            assert!(matches!(err, Error::Validation { field: "initial capital", .. }));
        }
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = Parameters::from([
            ("rsi_period".to_string(), ParamValue::Integer(7)),
            ("note".to_string(), ParamValue::from("tuned")),
        ]);
        let request = RequestBuilder::default()
            .build_with_overrides("mean_reversion_rsi", "SPY", "2024-01-01", "2025-01-01", None, &overrides)
            .unwrap();

        assert_eq!(request.parameters["rsi_period"], ParamValue::Integer(7));
        assert_eq!(request.parameters["rsi_oversold"], ParamValue::Integer(30));
        assert_eq!(request.parameters["note"], ParamValue::Text("tuned".to_string()));
    }

    #[test]
    fn custom_strategy_is_attached() {
        let spec = StrategySpec {
            name: DEFAULT_STRATEGY_NAME.to_string(),
            blocks: vec![BlockDescriptor {
                kind: BlockKind::Trigger,
                id: BlockId::from("market-open-1"),
                label: "Market Open".to_string(),
                config: BlockConfig::MarketOpen,
            }],
        };
        let request = build_custom(spec.clone());

        assert_eq!(request.strategy_type, CUSTOM_STRATEGY_TYPE);
        assert!(request.parameters.is_empty());
        assert_eq!(request.strategy, Some(spec));
    }

    fn build_custom(spec: StrategySpec) -> BacktestRequest {
        RequestBuilder::default()
            .build(spec, "AAPL", "2024-01-01T00:00:00Z", "2024-06-30", None)
            .unwrap()
    }
}
