use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Invalid strategy result format: {0}")]
    InvalidFormat(String),

    #[error("No entry signals found")]
    NoEntrySignals,

    #[error("Strategy validation failed: {0}")]
    ValidationFailed(String),
}
