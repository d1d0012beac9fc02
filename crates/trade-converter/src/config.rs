use position_sizer::{PositionSizer, SizingMethod, DEFAULT_MAX_POSITION_SIZE, DEFAULT_MIN_POSITION_SIZE};
use risk_manager::RiskManagementConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

pub const DEFAULT_RISK_PER_TRADE: f64 = 2.0;
pub const DEFAULT_STOP_LOSS_PIPS: f64 = 40.0;
pub const DEFAULT_TAKE_PROFIT_PIPS: f64 = 80.0;
pub const DEFAULT_MAX_DAILY_LOSS: f64 = 5.0;
pub const DEFAULT_MAX_DRAWDOWN: f64 = 10.0;

/// Risk and sizing parameters supplied with each conversion.
///
/// Zero, negative or non-finite values mean "not set" and fall back to the
/// defaults; see [`RiskConfig::normalized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskConfig {
    /// Percent of the balance risked per trade (2.0 = 2%)
    pub risk_per_trade: f64,
    pub max_position_size: u64,
    pub min_position_size: u64,
    /// Stop-loss distance in pips
    pub stop_loss: f64,
    /// Take-profit distance in pips
    pub take_profit: f64,
    pub max_daily_loss: f64,
    pub max_drawdown: f64,
    pub sizing_method: SizingMethod,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_per_trade: DEFAULT_RISK_PER_TRADE,
            max_position_size: DEFAULT_MAX_POSITION_SIZE,
            min_position_size: DEFAULT_MIN_POSITION_SIZE,
            stop_loss: DEFAULT_STOP_LOSS_PIPS,
            take_profit: DEFAULT_TAKE_PROFIT_PIPS,
            max_daily_loss: DEFAULT_MAX_DAILY_LOSS,
            max_drawdown: DEFAULT_MAX_DRAWDOWN,
            sizing_method: SizingMethod::default(),
        }
    }
}

fn or_default(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

impl RiskConfig {
    /// Replace unset values with their defaults.
    ///
    /// The minimum never exceeds the maximum, so a small cap still sizes to it.
    pub fn normalized(&self) -> Self {
        let max_position_size = match self.max_position_size {
            0 => DEFAULT_MAX_POSITION_SIZE,
            n => n,
        };
        let min_position_size = match self.min_position_size {
            0 => DEFAULT_MIN_POSITION_SIZE,
            n => n,
        };

        Self {
            risk_per_trade: or_default(self.risk_per_trade, DEFAULT_RISK_PER_TRADE),
            max_position_size,
            min_position_size: min_position_size.min(max_position_size),
            stop_loss: or_default(self.stop_loss, DEFAULT_STOP_LOSS_PIPS),
            take_profit: or_default(self.take_profit, DEFAULT_TAKE_PROFIT_PIPS),
            max_daily_loss: or_default(self.max_daily_loss, DEFAULT_MAX_DAILY_LOSS),
            max_drawdown: or_default(self.max_drawdown, DEFAULT_MAX_DRAWDOWN),
            sizing_method: self.sizing_method,
        }
    }

    pub fn position_sizer(&self) -> Result<PositionSizer, ConversionError> {
        let config = self.normalized();
        PositionSizer::new(config.min_position_size, config.max_position_size)
            .map_err(|e| ConversionError::InvalidConfig(e.to_string()))
    }

    pub fn risk_management(&self) -> RiskManagementConfig {
        let config = self.normalized();
        RiskManagementConfig {
            stop_loss_distance: config.stop_loss,
            take_profit_distance: config.take_profit,
            max_daily_loss: config.max_daily_loss,
            max_drawdown: config.max_drawdown,
        }
    }
}
