pub mod bridge;
pub mod config;
pub mod converter;
pub mod error;
pub mod validation;

pub use bridge::{OrderRiskCheck, SignalBridge};
pub use config::RiskConfig;
pub use converter::{
    convert_backtest_signals_to_orders, convert_signal_to_order, convert_signal_to_order_at,
    entry_signal_at, DEFAULT_SIGNAL_CONFIDENCE,
};
pub use error::ConversionError;
pub use validation::{has_valid_trading_signals, validate_backtest_signals, validate_trade_signal};
