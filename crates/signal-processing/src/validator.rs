use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use signal_core::{DirectionLabel, SignalStats, StrategyExecutionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub signal_stats: SignalStats,
    pub message: String,
}

impl ValidationReport {
    fn failed(errors: Vec<String>, warnings: Vec<String>, signal_stats: SignalStats) -> Self {
        let message = errors.join("; ");
        Self {
            is_valid: false,
            errors,
            warnings,
            signal_stats,
            message,
        }
    }
}

/// Check a strategy result against the signal contract.
///
/// A missing direction array is only a warning: the enforcer may still infer
/// one. Pure function of its input.
pub fn validate(result: &StrategyExecutionResult) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let (entry, exit) = match (&result.entry, &result.exit) {
        (Some(entry), Some(exit)) => (entry, exit),
        (entry, exit) => {
            if entry.is_none() {
                errors.push("Strategy must return 'entry' array".to_string());
            }
            if exit.is_none() {
                errors.push("Strategy must return 'exit' array".to_string());
            }
            return ValidationReport::failed(errors, warnings, SignalStats::default());
        }
    };

    let direction = result.direction.as_deref().filter(|d| !d.is_empty());

    if let Some(direction) = direction {
        if entry.len() != exit.len() || entry.len() != direction.len() {
            errors.push(format!(
                "Arrays must be same length: entry({}), exit({}), direction({})",
                entry.len(),
                exit.len(),
                direction.len()
            ));
        }

        let invalid: BTreeSet<&str> = direction
            .iter()
            .filter_map(|label| match label {
                DirectionLabel::Unrecognized(value) => Some(value.as_str()),
                _ => None,
            })
            .collect();
        if !invalid.is_empty() {
            errors.push(format!(
                "Invalid direction values: {}. Must be 'BUY', 'SELL', or null",
                invalid.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }
    } else {
        warnings.push("Direction array will be auto-generated from strategy conditions".to_string());
    }

    let signal_stats = signal_stats(entry, direction.unwrap_or(&[]));

    if signal_stats.total_entries == 0 {
        warnings.push("Strategy generates no entry signals - check entry conditions".to_string());
    } else if signal_stats.buy_signals == 0 && signal_stats.sell_signals == 0 {
        warnings.push(
            "Strategy generates no BUY or SELL signals. Check your entry conditions.".to_string(),
        );
    }

    if !errors.is_empty() {
        return ValidationReport::failed(errors, warnings, signal_stats);
    }

    let message = if direction.is_some() {
        format!(
            "Strategy valid: {} BUY signals, {} SELL signals",
            signal_stats.buy_signals, signal_stats.sell_signals
        )
    } else {
        "Strategy valid - will auto-generate directional signals".to_string()
    };

    ValidationReport {
        is_valid: true,
        errors,
        warnings,
        signal_stats,
        message,
    }
}

/// Count entries and join them with their direction by index
pub fn signal_stats(entry: &[bool], direction: &[DirectionLabel]) -> SignalStats {
    let mut stats = SignalStats {
        total_entries: entry.iter().filter(|&&e| e).count(),
        ..Default::default()
    };
    for (_, label) in entry.iter().zip(direction).filter(|(&e, _)| e) {
        match label {
            DirectionLabel::Buy => stats.buy_signals += 1,
            DirectionLabel::Sell => stats.sell_signals += 1,
            _ => {}
        }
    }
    stats
}
