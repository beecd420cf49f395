// In crates/core-types/src/block.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four roles a block can play in a strategy flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Decides *when* the strategy is evaluated.
    Trigger,
    /// Decides *which* symbols are evaluated.
    Universe,
    /// Filters the universe down to candidates.
    Condition,
    /// What happens to candidates that pass.
    Action,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Trigger => "trigger",
            BlockKind::Universe => "universe",
            BlockKind::Condition => "condition",
            BlockKind::Action => "action",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trigger" => Ok(BlockKind::Trigger),
            "universe" => Ok(BlockKind::Universe),
            "condition" => Ok(BlockKind::Condition),
            "action" => Ok(BlockKind::Action),
            other => Err(Error::validation("block type", format!("unknown block type '{other}'"))),
        }
    }
}

/// Identifier of a block, unique within one builder session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        BlockId(value.to_string())
    }
}

// --- Option enums shared by several block configurations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[default]
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "1hour")]
    OneHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    #[default]
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiThreshold {
    /// RSI below 30.
    #[default]
    Oversold,
    /// RSI above 70.
    Overbought,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    #[default]
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

// --- Per-variant configuration records ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeIntervalConfig {
    pub interval: Interval,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAlertConfig {
    pub symbol: String,
    pub price: f64,
    pub direction: Comparison,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomUniverseConfig {
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceVsMaConfig {
    pub period: u32,
    pub comparison: Comparison,
}

impl Default for PriceVsMaConfig {
    fn default() -> Self {
        Self { period: 200, comparison: Comparison::Above }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiLevelConfig {
    pub period: u32,
    pub threshold: RsiThreshold,
}

impl Default for RsiLevelConfig {
    fn default() -> Self {
        Self { period: 14, threshold: RsiThreshold::Oversold }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdCrossConfig {
    pub fast: u32,
    pub slow: u32,
    pub signal: u32,
    pub direction: CrossDirection,
}

impl Default for MacdCrossConfig {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9, direction: CrossDirection::Bullish }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpikeConfig {
    pub lookback: u32,
    pub multiplier: f64,
}

impl Default for VolumeSpikeConfig {
    fn default() -> Self {
        Self { lookback: 20, multiplier: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: u32,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self { period: 20, std_dev: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyConfig {
    pub order_type: OrderType,
    /// Percentage of portfolio value to allocate.
    pub position_size_pct: f64,
}

impl Default for BuyConfig {
    fn default() -> Self {
        Self { order_type: OrderType::Market, position_size_pct: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SellConfig {
    pub order_type: OrderType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopLossConfig {
    pub stop_loss_pct: f64,
}

impl Default for StopLossConfig {
    fn default() -> Self {
        Self { stop_loss_pct: 5.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeProfitConfig {
    pub take_profit_pct: f64,
}

impl Default for TakeProfitConfig {
    fn default() -> Self {
        Self { take_profit_pct: 15.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub message: String,
}

/// The configuration of a block, tagged by its palette variant.
///
/// The variant determines the block's [`BlockKind`], so a block can never carry
/// a configuration that belongs to a different role. On the wire the tag is
/// written inline, e.g. `{"variant": "rsi-level", "period": 14, "threshold": "oversold"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum BlockConfig {
    // Triggers
    TimeInterval(TimeIntervalConfig),
    MarketOpen,
    MarketClose,
    PriceAlert(PriceAlertConfig),
    // Universe
    Watchlist,
    Sp500,
    Nasdaq100,
    Custom(CustomUniverseConfig),
    // Conditions
    PriceVsMa(PriceVsMaConfig),
    RsiLevel(RsiLevelConfig),
    MacdCross(MacdCrossConfig),
    VolumeSpike(VolumeSpikeConfig),
    Bollinger(BollingerConfig),
    // Actions
    Buy(BuyConfig),
    Sell(SellConfig),
    SetStop(StopLossConfig),
    SetTarget(TakeProfitConfig),
    Notify(NotifyConfig),
}

/// One entry of the builder's block palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: BlockKind,
    pub variant_id: &'static str,
    pub label: &'static str,
}

const fn entry(kind: BlockKind, variant_id: &'static str, label: &'static str) -> PaletteEntry {
    PaletteEntry { kind, variant_id, label }
}

/// Every block variant the builder offers, grouped by kind in display order.
pub const PALETTE: &[PaletteEntry] = &[
    entry(BlockKind::Trigger, "time-interval", "Time Interval"),
    entry(BlockKind::Trigger, "market-open", "Market Open"),
    entry(BlockKind::Trigger, "market-close", "Market Close"),
    entry(BlockKind::Trigger, "price-alert", "Price Alert"),
    entry(BlockKind::Universe, "watchlist", "Watchlist"),
    entry(BlockKind::Universe, "sp500", "S&P 500"),
    entry(BlockKind::Universe, "nasdaq100", "NASDAQ 100"),
    entry(BlockKind::Universe, "custom", "Custom List"),
    entry(BlockKind::Condition, "price-vs-ma", "Price vs MA"),
    entry(BlockKind::Condition, "rsi-level", "RSI Level"),
    entry(BlockKind::Condition, "macd-cross", "MACD Cross"),
    entry(BlockKind::Condition, "volume-spike", "Volume Spike"),
    entry(BlockKind::Condition, "bollinger", "Bollinger Bands"),
    entry(BlockKind::Action, "buy", "Buy"),
    entry(BlockKind::Action, "sell", "Sell"),
    entry(BlockKind::Action, "set-stop", "Set Stop Loss"),
    entry(BlockKind::Action, "set-target", "Set Target"),
    entry(BlockKind::Action, "notify", "Send Alert"),
];

impl BlockConfig {
    /// Builds the default configuration for a palette variant.
    ///
    /// Fails with a validation error when `variant_id` is unknown or belongs to
    /// a different `kind`.
    pub fn default_for(kind: BlockKind, variant_id: &str) -> Result<Self> {
        let config = match variant_id {
            "time-interval" => BlockConfig::TimeInterval(Default::default()),
            "market-open" => BlockConfig::MarketOpen,
            "market-close" => BlockConfig::MarketClose,
            "price-alert" => BlockConfig::PriceAlert(Default::default()),
            "watchlist" => BlockConfig::Watchlist,
            "sp500" => BlockConfig::Sp500,
            "nasdaq100" => BlockConfig::Nasdaq100,
            "custom" => BlockConfig::Custom(Default::default()),
            "price-vs-ma" => BlockConfig::PriceVsMa(Default::default()),
            "rsi-level" => BlockConfig::RsiLevel(Default::default()),
            "macd-cross" => BlockConfig::MacdCross(Default::default()),
            "volume-spike" => BlockConfig::VolumeSpike(Default::default()),
            "bollinger" => BlockConfig::Bollinger(Default::default()),
            "buy" => BlockConfig::Buy(Default::default()),
            "sell" => BlockConfig::Sell(Default::default()),
            "set-stop" => BlockConfig::SetStop(Default::default()),
            "set-target" => BlockConfig::SetTarget(Default::default()),
            "notify" => BlockConfig::Notify(Default::default()),
            unknown => {
                return Err(Error::validation("block variant", format!("unknown block variant '{unknown}'")));
            }
        };

        if config.kind() != kind {
            return Err(Error::validation(
                "block variant",
                format!("'{}' is a {} block, not a {}", variant_id, config.kind(), kind),
            ));
        }
        Ok(config)
    }

    /// The palette id of this variant (e.g. `"rsi-level"`).
    pub fn variant_id(&self) -> &'static str {
        match self {
            BlockConfig::TimeInterval(_) => "time-interval",
            BlockConfig::MarketOpen => "market-open",
            BlockConfig::MarketClose => "market-close",
            BlockConfig::PriceAlert(_) => "price-alert",
            BlockConfig::Watchlist => "watchlist",
            BlockConfig::Sp500 => "sp500",
            BlockConfig::Nasdaq100 => "nasdaq100",
            BlockConfig::Custom(_) => "custom",
            BlockConfig::PriceVsMa(_) => "price-vs-ma",
            BlockConfig::RsiLevel(_) => "rsi-level",
            BlockConfig::MacdCross(_) => "macd-cross",
            BlockConfig::VolumeSpike(_) => "volume-spike",
            BlockConfig::Bollinger(_) => "bollinger",
            BlockConfig::Buy(_) => "buy",
            BlockConfig::Sell(_) => "sell",
            BlockConfig::SetStop(_) => "set-stop",
            BlockConfig::SetTarget(_) => "set-target",
            BlockConfig::Notify(_) => "notify",
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockConfig::TimeInterval(_)
            | BlockConfig::MarketOpen
            | BlockConfig::MarketClose
            | BlockConfig::PriceAlert(_) => BlockKind::Trigger,
            BlockConfig::Watchlist | BlockConfig::Sp500 | BlockConfig::Nasdaq100 | BlockConfig::Custom(_) => {
                BlockKind::Universe
            }
            BlockConfig::PriceVsMa(_)
            | BlockConfig::RsiLevel(_)
            | BlockConfig::MacdCross(_)
            | BlockConfig::VolumeSpike(_)
            | BlockConfig::Bollinger(_) => BlockKind::Condition,
            BlockConfig::Buy(_)
            | BlockConfig::Sell(_)
            | BlockConfig::SetStop(_)
            | BlockConfig::SetTarget(_)
            | BlockConfig::Notify(_) => BlockKind::Action,
        }
    }

    /// The display label the palette uses for this variant.
    pub fn palette_label(&self) -> &'static str {
        let id = self.variant_id();
        PALETTE
            .iter()
            .find(|e| e.variant_id == id)
            .map(|e| e.label)
            .unwrap_or(id)
    }

    /// Checks the option values of this configuration.
    pub fn validate(&self) -> Result<()> {
        match self {
            BlockConfig::PriceAlert(c) => {
                if c.symbol.trim().is_empty() {
                    return Err(Error::validation("price alert symbol", "must not be empty"));
                }
                positive("price alert price", c.price)
            }
            BlockConfig::Custom(c) => {
                if c.symbols.iter().all(|s| s.trim().is_empty()) {
                    return Err(Error::validation("custom universe", "must list at least one symbol"));
                }
                Ok(())
            }
            BlockConfig::PriceVsMa(c) => non_zero("moving average period", c.period),
            BlockConfig::RsiLevel(c) => non_zero("RSI period", c.period),
            BlockConfig::MacdCross(c) => {
                non_zero("MACD signal period", c.signal)?;
                non_zero("MACD fast period", c.fast)?;
                if c.fast >= c.slow {
                    return Err(Error::validation("MACD periods", "fast period must be shorter than slow period"));
                }
                Ok(())
            }
            BlockConfig::VolumeSpike(c) => {
                non_zero("volume lookback", c.lookback)?;
                positive("volume multiplier", c.multiplier)
            }
            BlockConfig::Bollinger(c) => {
                non_zero("Bollinger period", c.period)?;
                positive("Bollinger standard deviation", c.std_dev)
            }
            BlockConfig::Buy(c) => percentage("position size", c.position_size_pct),
            BlockConfig::SetStop(c) => percentage("stop loss", c.stop_loss_pct),
            BlockConfig::SetTarget(c) => positive("take profit", c.take_profit_pct),
            BlockConfig::TimeInterval(_)
            | BlockConfig::MarketOpen
            | BlockConfig::MarketClose
            | BlockConfig::Watchlist
            | BlockConfig::Sp500
            | BlockConfig::Nasdaq100
            | BlockConfig::Sell(_)
            | BlockConfig::Notify(_) => Ok(()),
        }
    }
}

fn non_zero(field: &'static str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::validation(field, "must be greater than zero"));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(field, format!("must be a positive number, got {value}")));
    }
    Ok(())
}

fn percentage(field: &'static str, value: f64) -> Result<()> {
    positive(field, value)?;
    if value > 100.0 {
        return Err(Error::validation(field, format!("must be at most 100%, got {value}")));
    }
    Ok(())
}

/// A single configurable unit of a visually assembled strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub label: String,
    pub config: BlockConfig,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.config.kind()
    }

    pub fn variant_id(&self) -> &'static str {
        self.config.variant_id()
    }
}
