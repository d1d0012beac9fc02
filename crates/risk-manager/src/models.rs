use serde::{Deserialize, Serialize};

/// Price distance of one pip on major pairs
pub const PIP_SIZE: f64 = 0.0001;

/// Decimal places used when formatting price levels
pub const PRICE_PRECISION: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskManagementConfig {
    /// Stop-loss distance in pips
    #[serde(default = "default_stop_loss_distance")]
    pub stop_loss_distance: f64,
    /// Take-profit distance in pips
    #[serde(default = "default_take_profit_distance")]
    pub take_profit_distance: f64,
    /// Maximum loss of a single trade as percent of the balance (5.0 = 5%)
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: f64,
    /// Maximum drawdown as percent of the balance
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: f64,
}

fn default_stop_loss_distance() -> f64 { 40.0 }
fn default_take_profit_distance() -> f64 { 80.0 }
fn default_max_daily_loss() -> f64 { 5.0 }
fn default_max_drawdown() -> f64 { 10.0 }

impl Default for RiskManagementConfig {
    fn default() -> Self {
        Self {
            stop_loss_distance: default_stop_loss_distance(),
            take_profit_distance: default_take_profit_distance(),
            max_daily_loss: default_max_daily_loss(),
            max_drawdown: default_max_drawdown(),
        }
    }
}

/// Stop-loss and take-profit as broker-ready strings.
///
/// Absolute prices when a current price was known, otherwise price distances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub stop_loss: String,
    pub take_profit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRiskAssessment {
    pub is_acceptable: bool,
    pub potential_loss: f64,
    pub risk_percentage: f64,
    pub warnings: Vec<String>,
}
