use serde::{Deserialize, Serialize};
use signal_core::{ProcessedSignals, SignalError, StrategyExecutionResult};

use crate::confidence::score_confidence;
use crate::enforcer::enforce;
use crate::validator::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Swap BUY and SELL on every bar
    pub reverse_signals: bool,
    pub score_confidence: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            reverse_signals: false,
            score_confidence: true,
        }
    }
}

/// Enforce, optionally reverse, re-validate and score a strategy result.
pub fn process(
    result: StrategyExecutionResult,
    reverse_signals: bool,
) -> Result<ProcessedSignals, SignalError> {
    process_with_options(
        result,
        ProcessOptions {
            reverse_signals,
            ..Default::default()
        },
    )
}

pub fn process_with_options(
    result: StrategyExecutionResult,
    options: ProcessOptions,
) -> Result<ProcessedSignals, SignalError> {
    let mut result = enforce(result)?;

    if options.reverse_signals {
        tracing::info!("Applying reverse signals transformation");
        reverse_directions(&mut result);
    }

    let report = validate(&result);
    if !report.is_valid {
        tracing::warn!("Final validation failed: {}", report.message);
        return Err(SignalError::ValidationFailed(report.message));
    }

    let confidence = if options.score_confidence {
        score_confidence(&result)
    } else {
        Vec::new()
    };

    tracing::debug!(
        "Processed {} bars: {} entries ({} BUY, {} SELL)",
        result.bar_count(),
        report.signal_stats.total_entries,
        report.signal_stats.buy_signals,
        report.signal_stats.sell_signals
    );

    Ok(ProcessedSignals {
        entry: result.entry.unwrap_or_default(),
        exit: result.exit.unwrap_or_default(),
        direction: result.direction.unwrap_or_default(),
        confidence,
        close: result.close,
        timestamps: Vec::new(),
        indicators: result.indicators,
        reverse_signals_applied: options.reverse_signals,
        auto_generated_direction: result.auto_generated_direction,
        inferred_bars: result.inferred_bars,
        validation_passed: true,
        validation_message: report.message,
        warnings: report.warnings,
        signal_stats: report.signal_stats,
        error: None,
    })
}

/// Flip every BUY to SELL and back. Entry and exit flags are untouched.
pub fn reverse_directions(result: &mut StrategyExecutionResult) {
    if let Some(direction) = result.direction.as_mut() {
        for label in direction.iter_mut() {
            *label = label.flipped();
        }
    }
}
