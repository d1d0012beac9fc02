use signal_core::Direction;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid trade signal: {0}")]
    InvalidSignal(String),

    #[error("Invalid backtest signals: {0}")]
    InvalidBacktestSignals(String),

    #[error("Invalid risk configuration: {0}")]
    InvalidConfig(String),

    #[error("Position size is zero for {symbol}; not trading")]
    ZeroPositionSize { symbol: String },

    #[error("Stop-distance sizing requires a current price")]
    MissingPrice,

    #[error("Risk levels stop={stop_loss} target={take_profit} are invalid for {direction} at {price}")]
    InvalidRiskLevels {
        direction: Direction,
        price: f64,
        stop_loss: String,
        take_profit: String,
    },
}
