use risk_manager::RiskManager;
use position_sizer::SizingMethod;
use signal_core::{ProcessedSignals, TradeAction, TradeOrder, TradeSignal};

use crate::config::RiskConfig;
use crate::error::ConversionError;

/// Confidence given to bulk-converted entries the processor did not score
pub const DEFAULT_SIGNAL_CONFIDENCE: f64 = 0.8;

/// Turn one signal into an order, levels as pip-distance strings.
pub fn convert_signal_to_order(
    signal: &TradeSignal,
    strategy_id: &str,
    user_id: &str,
    account_balance: f64,
    risk_config: &RiskConfig,
) -> Result<TradeOrder, ConversionError> {
    convert_signal_to_order_at(signal, strategy_id, user_id, account_balance, risk_config, None)
}

/// Like [`convert_signal_to_order`], with the bar's price available to
/// stop-distance sizing. Levels stay pip-distance strings either way.
pub fn convert_signal_to_order_at(
    signal: &TradeSignal,
    strategy_id: &str,
    user_id: &str,
    account_balance: f64,
    risk_config: &RiskConfig,
    current_price: Option<f64>,
) -> Result<TradeOrder, ConversionError> {
    let config = risk_config.normalized();
    let sizer = config.position_sizer()?;

    let size = match config.sizing_method {
        SizingMethod::FixedMultiplier => {
            sizer.calculate(account_balance, config.risk_per_trade)
        }
        SizingMethod::StopDistance => {
            let price = current_price.ok_or(ConversionError::MissingPrice)?;
            sizer.calculate_with_stop_loss(
                account_balance,
                config.risk_per_trade,
                config.stop_loss,
                price,
            )
        }
    };

    if size == 0 && signal.action != TradeAction::Close {
        return Err(ConversionError::ZeroPositionSize {
            symbol: signal.symbol.clone(),
        });
    }

    let (stop_loss, take_profit) = match signal.action {
        TradeAction::Close => (None, None),
        TradeAction::Buy | TradeAction::Sell => {
            let levels = RiskManager::calculate_risk_levels(config.stop_loss, config.take_profit, None);
            (Some(levels.stop_loss), Some(levels.take_profit))
        }
    };

    Ok(TradeOrder {
        action: signal.action,
        symbol: signal.symbol.clone(),
        units: signal.action.signed_units(size),
        stop_loss,
        take_profit,
        strategy_id: strategy_id.to_string(),
        user_id: user_id.to_string(),
    })
}

/// The entry signal on bar `index`, if that bar enters with a side.
///
/// Confidence comes from the processor's score, else
/// [`DEFAULT_SIGNAL_CONFIDENCE`]; the timestamp is the bar time when known.
pub fn entry_signal_at(signals: &ProcessedSignals, symbol: &str, index: usize) -> Option<TradeSignal> {
    if !signals.entry.get(index).copied().unwrap_or(false) {
        return None;
    }
    let direction = signals.direction_at(index)?;
    let confidence = signals
        .confidence_at(index)
        .unwrap_or(DEFAULT_SIGNAL_CONFIDENCE);

    let signal = TradeSignal::entry(symbol, direction, confidence);
    Some(match signals.timestamp_at(index) {
        Some(timestamp) => signal.at(timestamp),
        None => signal,
    })
}

fn close_order(symbol: &str, strategy_id: &str, user_id: &str) -> TradeOrder {
    TradeOrder {
        action: TradeAction::Close,
        symbol: symbol.to_string(),
        // the broker decides the closing size
        units: 0,
        stop_loss: None,
        take_profit: None,
        strategy_id: format!("{}_EXIT", strategy_id),
        user_id: user_id.to_string(),
    }
}

/// Walk a processed run bar by bar and emit orders in bar order.
///
/// A bar flagged both exit and entry emits the CLOSE first.
pub fn convert_backtest_signals_to_orders(
    signals: &ProcessedSignals,
    symbol: &str,
    strategy_id: &str,
    user_id: &str,
    account_balance: f64,
    risk_config: &RiskConfig,
) -> Result<Vec<TradeOrder>, ConversionError> {
    let mut orders = Vec::new();

    for (i, &is_entry) in signals.entry.iter().enumerate() {
        if signals.exit.get(i).copied().unwrap_or(false) {
            orders.push(close_order(symbol, strategy_id, user_id));
        }

        if !is_entry {
            continue;
        }
        let Some(signal) = entry_signal_at(signals, symbol, i) else {
            continue;
        };
        let price = signals.close.get(i).copied().filter(|p| p.is_finite());

        orders.push(convert_signal_to_order_at(
            &signal,
            strategy_id,
            user_id,
            account_balance,
            risk_config,
            price,
        )?);
    }

    tracing::debug!(
        "Converted {} bars into {} orders for {}",
        signals.bar_count(),
        orders.len(),
        symbol
    );

    Ok(orders)
}
