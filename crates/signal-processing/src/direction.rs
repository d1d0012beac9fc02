//! Heuristic BUY/SELL inference for entries the strategy left undirected.
//!
//! This is a fallback chain, not a validated signal: it only exists so an entry
//! is never dropped for lack of a side. Every bar resolved here is reported in
//! `StrategyExecutionResult::inferred_bars`.

use serde::{Deserialize, Serialize};
use signal_core::{Direction, StrategyExecutionResult};

pub const SHORT_MA_KEYS: [&str; 7] = [
    "short_ema", "fast_ema", "ema_fast", "short_ma", "fast_ma", "sma_fast", "short_sma",
];
pub const LONG_MA_KEYS: [&str; 7] = [
    "long_ema", "slow_ema", "ema_slow", "long_ma", "slow_ma", "sma_slow", "long_sma",
];
pub const RSI_KEYS: [&str; 2] = ["rsi", "RSI"];

/// RSI midpoint separating oversold (BUY) from overbought (SELL)
pub const RSI_MIDPOINT: f64 = 50.0;

/// Bars between the two closes compared by the momentum rule
pub const MOMENTUM_LOOKBACK: usize = 5;

/// Which rule of the fallback chain resolved a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    MovingAverage,
    Rsi,
    Momentum,
    Default,
}

/// Value of `series` at `index` when present and not NaN
pub(crate) fn value_at(series: Option<&[f64]>, index: usize) -> Option<f64> {
    series
        .and_then(|s| s.get(index))
        .copied()
        .filter(|v| !v.is_nan())
}

/// Resolve one entry bar, trying each rule in order.
pub fn infer_direction(
    result: &StrategyExecutionResult,
    close: &[f64],
    index: usize,
) -> (Direction, DetectionRule) {
    let short_ma = value_at(result.indicator(&SHORT_MA_KEYS), index);
    let long_ma = value_at(result.indicator(&LONG_MA_KEYS), index);
    if let (Some(short), Some(long)) = (short_ma, long_ma) {
        let direction = if short > long {
            Direction::Buy
        } else {
            Direction::Sell
        };
        return (direction, DetectionRule::MovingAverage);
    }

    if let Some(rsi) = value_at(result.indicator(&RSI_KEYS), index) {
        let direction = if rsi < RSI_MIDPOINT {
            Direction::Buy
        } else {
            Direction::Sell
        };
        return (direction, DetectionRule::Rsi);
    }

    if index >= MOMENTUM_LOOKBACK {
        let now = value_at(Some(close), index);
        let then = value_at(Some(close), index - MOMENTUM_LOOKBACK);
        if let (Some(now), Some(then)) = (now, then) {
            let direction = if now - then > 0.0 {
                Direction::Buy
            } else {
                Direction::Sell
            };
            return (direction, DetectionRule::Momentum);
        }
    }

    (Direction::Buy, DetectionRule::Default)
}

/// Infer a direction for every entry bar; non-entry bars map to `None`.
pub fn detect_direction(result: &StrategyExecutionResult, close: &[f64]) -> Vec<Option<Direction>> {
    let Some(entry) = &result.entry else {
        return Vec::new();
    };

    let mut by_rule = [0usize; 4];
    let direction: Vec<Option<Direction>> = entry
        .iter()
        .enumerate()
        .map(|(i, &is_entry)| {
            is_entry.then(|| {
                let (direction, rule) = infer_direction(result, close, i);
                by_rule[rule as usize] += 1;
                direction
            })
        })
        .collect();

    let buys = direction.iter().filter(|d| **d == Some(Direction::Buy)).count();
    let sells = direction.iter().filter(|d| **d == Some(Direction::Sell)).count();
    tracing::debug!(
        "Auto-detected {} BUY and {} SELL directions (ma={}, rsi={}, momentum={}, default={})",
        buys,
        sells,
        by_rule[DetectionRule::MovingAverage as usize],
        by_rule[DetectionRule::Rsi as usize],
        by_rule[DetectionRule::Momentum as usize],
        by_rule[DetectionRule::Default as usize],
    );

    direction
}
