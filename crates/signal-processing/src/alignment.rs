use signal_core::{DirectionLabel, StrategyExecutionResult};

/// Pad or truncate the signal arrays to the market-data bar count.
///
/// Missing arrays are left missing so the validator still reports them.
pub fn align_to_bars(result: &mut StrategyExecutionResult, bar_count: usize) {
    if let Some(entry) = result.entry.as_mut() {
        entry.resize(bar_count, false);
    }
    if let Some(exit) = result.exit.as_mut() {
        exit.resize(bar_count, false);
    }
    if let Some(direction) = result.direction.as_mut().filter(|d| !d.is_empty()) {
        direction.resize(bar_count, DirectionLabel::Flat);
    }
    result.inferred_bars.retain(|&i| i < bar_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_and_truncates_long_arrays() {
        let mut result = StrategyExecutionResult::new(
            vec![true],
            vec![false, false, true, true],
            Some(vec![DirectionLabel::Sell]),
        );
        align_to_bars(&mut result, 3);
        assert_eq!(result.entry, Some(vec![true, false, false]));
        assert_eq!(result.exit, Some(vec![false, false, true]));
        assert_eq!(
            result.direction,
            Some(vec![DirectionLabel::Sell, DirectionLabel::Flat, DirectionLabel::Flat])
        );
    }

    #[test]
    fn leaves_missing_arrays_missing() {
        let mut result = StrategyExecutionResult {
            exit: Some(vec![false]),
            ..Default::default()
        };
        align_to_bars(&mut result, 2);
        assert!(result.entry.is_none());
        assert!(result.direction.is_none());
    }
}
