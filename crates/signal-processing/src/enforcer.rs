use signal_core::{DirectionLabel, SignalError, StrategyExecutionResult};

use crate::direction::{detect_direction, infer_direction};
use crate::validator::validate;

/// Guarantee that every entry bar carries a BUY or SELL.
///
/// A result that already validates with a fully resolved direction array is
/// returned unchanged. Otherwise directions are inferred: only the missing ones
/// when the authored array is structurally sound, the whole array when it is
/// absent or invalid. The repaired result is validated again; anything still
/// broken is a terminal error.
pub fn enforce(mut result: StrategyExecutionResult) -> Result<StrategyExecutionResult, SignalError> {
    let report = validate(&result);

    if report.is_valid && result.has_direction() && result.unresolved_entries().is_empty() {
        tracing::debug!("{}", report.message);
        return Ok(result);
    }

    if result.bar_count() == 0 {
        tracing::warn!("Cannot enforce directions: no entry signals found");
        return Err(SignalError::NoEntrySignals);
    }

    if report.is_valid && result.has_direction() {
        let unresolved = result.unresolved_entries();
        let mut direction = result.direction.take().unwrap_or_default();
        for &i in &unresolved {
            let (side, rule) = infer_direction(&result, &result.close, i);
            tracing::debug!("Bar {} has no authored direction, inferred {} via {:?}", i, side, rule);
            direction[i] = side.into();
        }
        result.direction = Some(direction);
        result.inferred_bars.extend(unresolved);
        result.inferred_bars.sort_unstable();
        result.inferred_bars.dedup();
    } else {
        if result.has_direction() {
            tracing::warn!(
                "Discarding authored direction array: {}",
                report.errors.join("; ")
            );
        }
        let detected = detect_direction(&result, &result.close);
        result.inferred_bars = detected
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_some())
            .map(|(i, _)| i)
            .collect();
        result.direction = Some(detected.into_iter().map(DirectionLabel::from).collect());
    }
    result.auto_generated_direction = true;

    let report = validate(&result);
    if !report.is_valid {
        tracing::warn!("Signals still invalid after direction inference: {}", report.message);
        return Err(SignalError::ValidationFailed(report.message));
    }

    tracing::info!(
        "Auto-generated directional signals: {} BUY, {} SELL ({} bars inferred)",
        report.signal_stats.buy_signals,
        report.signal_stats.sell_signals,
        result.inferred_bars.len()
    );

    Ok(result)
}
