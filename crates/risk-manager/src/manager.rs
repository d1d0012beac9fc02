use signal_core::Direction;

use crate::models::*;

fn format_price(value: f64) -> String {
    format!("{:.*}", PRICE_PRECISION, value)
}

fn pips_to_price(pips: f64) -> f64 {
    pips * PIP_SIZE
}

/// Stop/target geometry and advisory pre-trade risk checks.
///
/// Nothing here rejects an order on its own; callers decide what to do with
/// a failed check.
#[derive(Debug, Clone, Default)]
pub struct RiskManager {
    config: RiskManagementConfig,
}

impl RiskManager {
    pub fn new(config: RiskManagementConfig) -> Self {
        Self { config }
    }

    /// Levels from pip distances, BUY geometry: stop below, target above.
    ///
    /// Without a usable current price the pip distances are returned as price
    /// distances instead.
    pub fn calculate_risk_levels(
        stop_loss_pips: f64,
        take_profit_pips: f64,
        current_price: Option<f64>,
    ) -> RiskLevels {
        match current_price.filter(|p| p.is_finite() && *p > 0.0) {
            Some(price) => RiskLevels {
                stop_loss: format_price(price - pips_to_price(stop_loss_pips)),
                take_profit: format_price(price + pips_to_price(take_profit_pips)),
            },
            None => RiskLevels {
                stop_loss: format_price(pips_to_price(stop_loss_pips)),
                take_profit: format_price(pips_to_price(take_profit_pips)),
            },
        }
    }

    /// Absolute levels placed on the correct side of the price for `direction`.
    pub fn directional_levels(
        direction: Direction,
        stop_loss_pips: f64,
        take_profit_pips: f64,
        current_price: f64,
    ) -> RiskLevels {
        let stop = pips_to_price(stop_loss_pips);
        let target = pips_to_price(take_profit_pips);
        let (stop_loss, take_profit) = match direction {
            Direction::Buy => (current_price - stop, current_price + target),
            Direction::Sell => (current_price + stop, current_price - target),
        };
        RiskLevels {
            stop_loss: format_price(stop_loss),
            take_profit: format_price(take_profit),
        }
    }

    /// Levels from the configured pip distances
    pub fn levels(&self, current_price: Option<f64>) -> RiskLevels {
        Self::calculate_risk_levels(
            self.config.stop_loss_distance,
            self.config.take_profit_distance,
            current_price,
        )
    }

    /// BUY needs `stop < price < target`, SELL needs `target < price < stop`.
    pub fn validate_risk_levels(
        stop_loss: f64,
        take_profit: f64,
        current_price: f64,
        direction: Direction,
    ) -> bool {
        match direction {
            Direction::Buy => stop_loss < current_price && take_profit > current_price,
            Direction::Sell => stop_loss > current_price && take_profit < current_price,
        }
    }

    /// Reward over risk, measured in the trade's direction. 0 when risk <= 0.
    pub fn risk_reward_ratio(
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        direction: Direction,
    ) -> f64 {
        let (risk, reward) = match direction {
            Direction::Buy => (entry_price - stop_loss, take_profit - entry_price),
            Direction::Sell => (stop_loss - entry_price, entry_price - take_profit),
        };
        if risk > 0.0 {
            reward / risk
        } else {
            0.0
        }
    }

    /// Compare a trade's worst-case loss against the configured limits.
    pub fn assess_trade_risk(
        &self,
        account_balance: f64,
        position_size: u64,
        stop_loss_pips: f64,
    ) -> TradeRiskAssessment {
        let potential_loss = position_size as f64 * (stop_loss_pips / 10_000.0);

        if !(account_balance.is_finite() && account_balance > 0.0) {
            return TradeRiskAssessment {
                is_acceptable: false,
                potential_loss,
                risk_percentage: 0.0,
                warnings: vec!["Account balance must be positive".to_string()],
            };
        }

        let risk_percentage = (potential_loss / account_balance) * 100.0;
        let mut warnings = Vec::new();

        if risk_percentage > self.config.max_daily_loss {
            warnings.push(format!(
                "Risk exceeds daily loss limit: {:.2}%",
                risk_percentage
            ));
        }

        if potential_loss > account_balance * (self.config.max_drawdown / 100.0) {
            warnings.push("Potential loss exceeds drawdown limit".to_string());
        }

        let is_acceptable = warnings.is_empty();
        if !is_acceptable {
            tracing::warn!(
                "Trade risk {:.2}% of balance flagged: {}",
                risk_percentage,
                warnings.join("; ")
            );
        }

        TradeRiskAssessment {
            is_acceptable,
            potential_loss,
            risk_percentage,
            warnings,
        }
    }
}
