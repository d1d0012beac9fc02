use position_sizer::{validate_position_size, PositionSizingConfig};
use risk_manager::RiskManager;
use serde::{Deserialize, Serialize};
use signal_core::{ProcessedSignals, TradeAction, TradeOrder, TradeSignal};

use crate::config::RiskConfig;
use crate::converter::{convert_backtest_signals_to_orders, convert_signal_to_order_at};
use crate::error::ConversionError;
use crate::validation::{has_valid_trading_signals, validate_backtest_signals, validate_trade_signal};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRiskCheck {
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

/// Validates signals and turns them into orders for one strategy and user.
#[derive(Debug, Clone)]
pub struct SignalBridge {
    strategy_id: String,
    user_id: String,
    account_balance: f64,
    risk_config: RiskConfig,
}

impl SignalBridge {
    pub fn new(
        strategy_id: impl Into<String>,
        user_id: impl Into<String>,
        account_balance: f64,
        risk_config: RiskConfig,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            user_id: user_id.into(),
            account_balance,
            risk_config: risk_config.normalized(),
        }
    }

    /// Validate and convert a single live signal.
    pub fn process_signal(&self, signal: &TradeSignal) -> Result<TradeOrder, ConversionError> {
        validate_trade_signal(signal)?;
        let order = convert_signal_to_order_at(
            signal,
            &self.strategy_id,
            &self.user_id,
            self.account_balance,
            &self.risk_config,
            None,
        )?;

        tracing::info!(
            "{} order created for {} with {} units",
            order.action,
            order.symbol,
            order.units
        );
        Ok(order)
    }

    /// Convert a processed run, surfacing conversion failures.
    ///
    /// A run with no BUY or SELL entries converts to no orders.
    pub fn convert_backtest_signals(
        &self,
        signals: &ProcessedSignals,
        symbol: &str,
    ) -> Result<Vec<TradeOrder>, ConversionError> {
        validate_backtest_signals(signals)?;

        if !has_valid_trading_signals(signals) {
            tracing::warn!("No valid trading signals found in backtest results");
            return Ok(Vec::new());
        }

        let orders = convert_backtest_signals_to_orders(
            signals,
            symbol,
            &self.strategy_id,
            &self.user_id,
            self.account_balance,
            &self.risk_config,
        )?;
        tracing::info!("Processed {} trade orders from backtest signals", orders.len());
        Ok(orders)
    }

    /// Like [`SignalBridge::convert_backtest_signals`], but anything unusable
    /// yields no orders.
    pub fn process_backtest_signals(
        &self,
        signals: &ProcessedSignals,
        symbol: &str,
    ) -> Vec<TradeOrder> {
        self.convert_backtest_signals(signals, symbol)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to process backtest signals: {}", e);
                Vec::new()
            })
    }

    /// Advisory size and loss checks on an order about to be submitted.
    ///
    /// CLOSE orders carry no size of their own and always pass.
    pub fn validate_order_risk(&self, order: &TradeOrder) -> OrderRiskCheck {
        if order.action == TradeAction::Close {
            return OrderRiskCheck {
                is_valid: true,
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();
        let sizing = PositionSizingConfig {
            account_balance: self.account_balance,
            risk_per_trade: self.risk_config.risk_per_trade,
            max_position_size: self.risk_config.max_position_size,
            min_position_size: self.risk_config.min_position_size,
        };

        if !validate_position_size(order.magnitude(), &sizing) {
            warnings.push("Position size outside acceptable limits".to_string());
        }

        if order.stop_loss.is_some() {
            let manager = RiskManager::new(self.risk_config.risk_management());
            let assessment = manager.assess_trade_risk(
                self.account_balance,
                order.magnitude(),
                self.risk_config.stop_loss,
            );
            warnings.extend(assessment.warnings);
        }

        OrderRiskCheck {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }

    /// Convert with absolute stop and target prices around `current_price`.
    pub fn to_priced_order(
        &self,
        signal: &TradeSignal,
        current_price: f64,
    ) -> Result<TradeOrder, ConversionError> {
        validate_trade_signal(signal)?;
        if !(current_price.is_finite() && current_price > 0.0) {
            return Err(ConversionError::MissingPrice);
        }
        let mut order = convert_signal_to_order_at(
            signal,
            &self.strategy_id,
            &self.user_id,
            self.account_balance,
            &self.risk_config,
            Some(current_price),
        )?;

        let Some(direction) = signal.action.direction() else {
            return Ok(order);
        };

        let levels = RiskManager::directional_levels(
            direction,
            self.risk_config.stop_loss,
            self.risk_config.take_profit,
            current_price,
        );
        let stop_loss: f64 = levels.stop_loss.parse().unwrap_or(f64::NAN);
        let take_profit: f64 = levels.take_profit.parse().unwrap_or(f64::NAN);

        if !RiskManager::validate_risk_levels(stop_loss, take_profit, current_price, direction) {
            return Err(ConversionError::InvalidRiskLevels {
                direction,
                price: current_price,
                stop_loss: levels.stop_loss,
                take_profit: levels.take_profit,
            });
        }

        order.stop_loss = Some(levels.stop_loss);
        order.take_profit = Some(levels.take_profit);
        Ok(order)
    }
}
