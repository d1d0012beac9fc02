//! Advisory confidence per directional entry. Never used to gate a signal.

use signal_core::{Direction, StrategyExecutionResult};

use crate::direction::{value_at, RSI_KEYS};

pub const BASE_CONFIDENCE: f64 = 0.70;
/// Added when the previous bar points the same way
pub const PERSISTENCE_BONUS: f64 = 0.10;
/// Added when RSI sits at the extreme that supports the side
pub const RSI_CONFIRMATION_BONUS: f64 = 0.15;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

pub fn score_confidence(result: &StrategyExecutionResult) -> Vec<Option<f64>> {
    let rsi = result.indicator(&RSI_KEYS);

    (0..result.bar_count())
        .map(|i| {
            if !result.is_entry(i) {
                return None;
            }
            let side = result.direction_at(i)?;

            let mut score = BASE_CONFIDENCE;
            if i > 0 && result.direction_at(i - 1) == Some(side) {
                score += PERSISTENCE_BONUS;
            }
            let confirmed = match (side, value_at(rsi, i)) {
                (Direction::Buy, Some(v)) => v < RSI_OVERSOLD,
                (Direction::Sell, Some(v)) => v > RSI_OVERBOUGHT,
                (_, None) => false,
            };
            if confirmed {
                score += RSI_CONFIRMATION_BONUS;
            }
            Some(score.min(1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use signal_core::DirectionLabel;

    #[test]
    fn scores_only_directional_entries() {
        let result = StrategyExecutionResult::new(
            vec![false, true, true],
            vec![false; 3],
            Some(vec![DirectionLabel::Flat, DirectionLabel::Buy, DirectionLabel::Buy]),
        )
        .with_indicator("rsi", vec![50.0, 45.0, 25.0]);

        let scores = score_confidence(&result);
        assert_eq!(scores[0], None);
        assert_relative_eq!(scores[1].unwrap(), 0.70, epsilon = 1e-9);
        // persistence + oversold confirmation
        assert_relative_eq!(scores[2].unwrap(), 0.95, epsilon = 1e-9);
    }

    #[test]
    fn overbought_confirms_sell_only() {
        let result = StrategyExecutionResult::new(
            vec![true, true],
            vec![false; 2],
            Some(vec![DirectionLabel::Buy, DirectionLabel::Sell]),
        )
        .with_indicator("rsi", vec![80.0, 80.0]);

        let scores = score_confidence(&result);
        assert_relative_eq!(scores[0].unwrap(), 0.70, epsilon = 1e-9);
        assert_relative_eq!(scores[1].unwrap(), 0.85, epsilon = 1e-9);
    }
}
