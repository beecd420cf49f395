// In crates/strategies/src/types.rs

use core_types::{ParamValue, Parameters};
use serde::{Deserialize, Serialize};

/// A strategy template whose default parameters are known at compile time.
pub trait TemplateSettings: Default {
    /// The `strategyType` the service knows this template by.
    const ID: &'static str;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const TYPICAL_TRADES_PER_MONTH: &'static str;

    /// The settings flattened into request parameters.
    fn parameters(&self) -> Parameters;
}

fn int(v: u32) -> ParamValue {
    ParamValue::Integer(i64::from(v))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MomentumBreakoutSettings {
    pub lookback_period: u32,
    pub volume_multiplier: f64,
    pub position_size_pct: u32,
    pub stop_loss_pct: u32,
    pub take_profit_pct: u32,
    pub max_positions: u32,
}

impl Default for MomentumBreakoutSettings {
    fn default() -> Self {
        Self {
            lookback_period: 20,
            volume_multiplier: 1.5,
            position_size_pct: 10,
            stop_loss_pct: 5,
            take_profit_pct: 15,
            max_positions: 5,
        }
    }
}

impl TemplateSettings for MomentumBreakoutSettings {
    const ID: &'static str = "momentum_breakout";
    const NAME: &'static str = "Momentum Breakout";
    const DESCRIPTION: &'static str = "Buy when price exceeds N-day high with volume confirmation";
    const TYPICAL_TRADES_PER_MONTH: &'static str = "5-15";

    fn parameters(&self) -> Parameters {
        Parameters::from([
            ("lookback_period".to_string(), int(self.lookback_period)),
            ("volume_multiplier".to_string(), ParamValue::Number(self.volume_multiplier)),
            ("position_size_pct".to_string(), int(self.position_size_pct)),
            ("stop_loss_pct".to_string(), int(self.stop_loss_pct)),
            ("take_profit_pct".to_string(), int(self.take_profit_pct)),
            ("max_positions".to_string(), int(self.max_positions)),
        ])
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MeanReversionRsiSettings {
    pub rsi_period: u32,
    pub rsi_oversold: u32,
    pub rsi_overbought: u32,
    pub ma_period: u32,
    pub position_size_pct: u32,
}

impl Default for MeanReversionRsiSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_oversold: 30,
            rsi_overbought: 70,
            ma_period: 200,
            position_size_pct: 10,
        }
    }
}

impl TemplateSettings for MeanReversionRsiSettings {
    const ID: &'static str = "mean_reversion_rsi";
    const NAME: &'static str = "Mean Reversion RSI";
    const DESCRIPTION: &'static str = "Buy when RSI oversold + price above 200MA; sell when RSI overbought";
    const TYPICAL_TRADES_PER_MONTH: &'static str = "10-25";

    fn parameters(&self) -> Parameters {
        Parameters::from([
            ("rsi_period".to_string(), int(self.rsi_period)),
            ("rsi_oversold".to_string(), int(self.rsi_oversold)),
            ("rsi_overbought".to_string(), int(self.rsi_overbought)),
            ("ma_period".to_string(), int(self.ma_period)),
            ("position_size_pct".to_string(), int(self.position_size_pct)),
        ])
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DualMovingAverageSettings {
    pub fast_ma: u32,
    pub slow_ma: u32,
    // Trend filter period.
    pub trend_ma: u32,
    pub position_size_pct: u32,
}

impl Default for DualMovingAverageSettings {
    fn default() -> Self {
        Self {
            fast_ma: 50,
            slow_ma: 200,
            trend_ma: 20,
            position_size_pct: 20,
        }
    }
}

impl TemplateSettings for DualMovingAverageSettings {
    const ID: &'static str = "dual_moving_average";
    const NAME: &'static str = "Dual Moving Average";
    const DESCRIPTION: &'static str = "Classic golden/death cross with trend filter";
    const TYPICAL_TRADES_PER_MONTH: &'static str = "3-8";

    fn parameters(&self) -> Parameters {
        Parameters::from([
            ("fast_ma".to_string(), int(self.fast_ma)),
            ("slow_ma".to_string(), int(self.slow_ma)),
            ("trend_ma".to_string(), int(self.trend_ma)),
            ("position_size_pct".to_string(), int(self.position_size_pct)),
        ])
    }
}
