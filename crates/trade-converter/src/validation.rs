use signal_core::{ProcessedSignals, TradeAction, TradeSignal};

use crate::error::ConversionError;

/// Structural checks on a single signal before it is converted.
pub fn validate_trade_signal(signal: &TradeSignal) -> Result<(), ConversionError> {
    if signal.symbol.trim().is_empty() {
        return Err(ConversionError::InvalidSignal(
            "Missing action or symbol".to_string(),
        ));
    }

    if signal.action != TradeAction::Close && signal.direction.is_none() {
        return Err(ConversionError::InvalidSignal(
            "Missing direction for non-close action".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&signal.confidence) {
        return Err(ConversionError::InvalidSignal(
            "Confidence must be between 0 and 1".to_string(),
        ));
    }

    Ok(())
}

/// Per-bar arrays are present and of equal length.
pub fn validate_backtest_signals(signals: &ProcessedSignals) -> Result<(), ConversionError> {
    if let Some(error) = &signals.error {
        return Err(ConversionError::InvalidBacktestSignals(error.clone()));
    }

    let bars = signals.entry.len();
    if signals.exit.len() != bars || signals.direction.len() != bars {
        return Err(ConversionError::InvalidBacktestSignals(format!(
            "Array lengths must match: entry({}), exit({}), direction({})",
            bars,
            signals.exit.len(),
            signals.direction.len()
        )));
    }

    Ok(())
}

/// At least one entry bar carries BUY or SELL
pub fn has_valid_trading_signals(signals: &ProcessedSignals) -> bool {
    signals
        .entry
        .iter()
        .enumerate()
        .any(|(i, &is_entry)| is_entry && signals.direction_at(i).is_some())
}
