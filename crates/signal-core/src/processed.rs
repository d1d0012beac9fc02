use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Direction, DirectionLabel, SignalError, SignalStats, StrategyExecutionResult};

/// Final output of the signal pipeline, ready for order conversion.
///
/// A terminal failure is represented with empty arrays and `error` set, the
/// shape UI-facing diagnostics expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSignals {
    pub entry: Vec<bool>,
    pub exit: Vec<bool>,
    pub direction: Vec<DirectionLabel>,
    /// Advisory score per bar, set only on directional entries
    #[serde(default)]
    pub confidence: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<f64>,
    /// Bar open times, when the market data carried them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub indicators: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub reverse_signals_applied: bool,
    #[serde(default)]
    pub auto_generated_direction: bool,
    #[serde(default)]
    pub inferred_bars: Vec<usize>,
    #[serde(default)]
    pub validation_passed: bool,
    #[serde(default)]
    pub validation_message: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub signal_stats: SignalStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessedSignals {
    pub fn terminal(error: &SignalError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.error.is_some()
    }

    pub fn bar_count(&self) -> usize {
        self.entry.len()
    }

    pub fn direction_at(&self, index: usize) -> Option<Direction> {
        self.direction.get(index).and_then(DirectionLabel::as_direction)
    }

    pub fn confidence_at(&self, index: usize) -> Option<f64> {
        self.confidence.get(index).copied().flatten()
    }

    pub fn timestamp_at(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps.get(index).copied()
    }
}

impl From<ProcessedSignals> for StrategyExecutionResult {
    fn from(processed: ProcessedSignals) -> Self {
        Self {
            entry: Some(processed.entry),
            exit: Some(processed.exit),
            direction: Some(processed.direction),
            close: processed.close,
            indicators: processed.indicators,
            auto_generated_direction: processed.auto_generated_direction,
            inferred_bars: processed.inferred_bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_shape_has_empty_arrays_and_error() {
        let failed = ProcessedSignals::terminal(&SignalError::NoEntrySignals);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["entry"], serde_json::json!([]));
        assert_eq!(json["exit"], serde_json::json!([]));
        assert_eq!(json["direction"], serde_json::json!([]));
        assert_eq!(json["error"], "No entry signals found");
        assert!(failed.is_terminal());
    }
}
