use serde_json::json;
use signal_core::{
    Direction, DirectionLabel, MarketData, SignalError, StrategyExecutionResult,
};

use crate::{enforce, process, validate, PipelineOptions, SignalPipeline};

/// Helper: build a result from raw JSON the way a strategy would emit it.
fn raw(value: serde_json::Value) -> StrategyExecutionResult {
    StrategyExecutionResult::from_value(&value).expect("object input")
}

fn labels(values: &[Option<Direction>]) -> Vec<DirectionLabel> {
    values.iter().map(|d| DirectionLabel::from(*d)).collect()
}

#[test]
fn missing_direction_is_inferred_with_default_rule() {
    let result = raw(json!({
        "entry": [false, true, false],
        "exit": [false, false, true],
        "close": [1.10, 1.12, 1.11]
    }));

    let enforced = enforce(result).unwrap();
    assert_eq!(
        enforced.direction,
        Some(labels(&[None, Some(Direction::Buy), None]))
    );
    assert!(enforced.auto_generated_direction);
    assert_eq!(enforced.inferred_bars, vec![1]);
}

#[test]
fn reversal_flips_authored_direction() {
    let result = raw(json!({"entry": [true], "exit": [false], "direction": ["SELL"]}));
    let processed = process(result, true).unwrap();
    assert_eq!(processed.direction, vec![DirectionLabel::Buy]);
    assert!(processed.reverse_signals_applied);
    assert_eq!(processed.entry, vec![true]);
    assert_eq!(processed.exit, vec![false]);
}

#[test]
fn empty_entry_is_terminal() {
    let result = raw(json!({"entry": []}));
    assert_eq!(enforce(result).unwrap_err(), SignalError::NoEntrySignals);

    let pipeline = SignalPipeline::default();
    let failed = pipeline.run_or_terminal(&json!({"entry": []}), None);
    assert!(failed.entry.is_empty());
    assert!(failed.exit.is_empty());
    assert!(failed.direction.is_empty());
    assert_eq!(failed.error.as_deref(), Some("No entry signals found"));
}

#[test]
fn invalid_direction_value_is_named() {
    let result = raw(json!({
        "entry": [true, false],
        "exit": [false, false],
        "direction": ["HOLD", null]
    }));
    let report = validate(&result);
    assert!(!report.is_valid);
    assert!(report.errors.iter().any(|e| e.contains("HOLD")));
}

#[test]
fn missing_entry_and_exit_are_errors() {
    let report = validate(&raw(json!({"direction": ["BUY"]})));
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn missing_direction_is_only_a_warning() {
    let report = validate(&raw(json!({"entry": [true], "exit": [false]})));
    assert!(report.is_valid);
    assert!(report.warnings.iter().any(|w| w.contains("auto-generated")));
    assert_eq!(report.signal_stats.total_entries, 1);
    assert_eq!(report.signal_stats.buy_signals, 0);
}

#[test]
fn length_mismatch_fails_when_direction_present() {
    let report = validate(&raw(json!({
        "entry": [true, false],
        "exit": [false],
        "direction": ["BUY", null]
    })));
    assert!(!report.is_valid);
    assert!(report.errors[0].contains("same length"));
}

#[test]
fn entries_without_any_side_warn() {
    let report = validate(&raw(json!({
        "entry": [true, false],
        "exit": [false, false],
        "direction": [null, null]
    })));
    assert!(report.is_valid);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("no BUY or SELL")));
}

#[test]
fn stats_join_entries_with_direction() {
    let report = validate(&raw(json!({
        "entry": [true, true, false, true],
        "exit": [false, false, false, false],
        "direction": ["BUY", "SELL", "BUY", "NONE"]
    })));
    assert_eq!(report.signal_stats.total_entries, 3);
    assert_eq!(report.signal_stats.buy_signals, 1);
    assert_eq!(report.signal_stats.sell_signals, 1);
}

#[test]
fn enforcement_is_idempotent() {
    let authored = raw(json!({
        "entry": [true, false, true],
        "exit": [false, true, false],
        "direction": ["BUY", null, "SELL"]
    }));
    let once = enforce(authored.clone()).unwrap();
    assert_eq!(once, authored);
    assert_eq!(enforce(once.clone()).unwrap(), once);

    let inferred = raw(json!({"entry": [true, false], "exit": [false, true]}));
    let once = enforce(inferred).unwrap();
    assert_eq!(enforce(once.clone()).unwrap(), once);
}

#[test]
fn partial_directions_keep_authored_bars() {
    let result = raw(json!({
        "entry": [true, true],
        "exit": [false, false],
        "direction": ["SELL", null],
        "rsi": [20.0, 80.0]
    }));
    let enforced = enforce(result).unwrap();
    assert_eq!(enforced.direction_at(0), Some(Direction::Sell));
    assert_eq!(enforced.direction_at(1), Some(Direction::Sell));
    assert_eq!(enforced.inferred_bars, vec![1]);
    assert!(enforced.auto_generated_direction);
}

#[test]
fn invalid_authored_direction_is_replaced() {
    let result = raw(json!({
        "entry": [true],
        "exit": [false],
        "direction": ["HOLD"],
        "short_ema": [1.2],
        "long_ema": [1.1]
    }));
    let enforced = enforce(result).unwrap();
    assert_eq!(enforced.direction, Some(vec![DirectionLabel::Buy]));
}

#[test]
fn missing_exit_fails_after_inference() {
    let result = raw(json!({"entry": [true, false]}));
    assert!(matches!(
        enforce(result),
        Err(SignalError::ValidationFailed(_))
    ));
}

#[test]
fn entry_bars_always_resolve_after_processing() {
    let result = raw(json!({
        "entry": [true, false, true, true, false, false, true],
        "exit": [false, true, false, false, true, false, false],
        "direction": [null, null, "SELL", null, null, null, null],
        "close": [1.0, 1.01, 1.02, 1.03, 1.04, 1.05, 1.06]
    }));
    let processed = process(result, false).unwrap();
    assert_eq!(processed.entry.len(), processed.exit.len());
    assert_eq!(processed.entry.len(), processed.direction.len());
    for (i, &is_entry) in processed.entry.iter().enumerate() {
        if is_entry {
            assert!(processed.direction_at(i).is_some(), "bar {i} unresolved");
        }
    }
    assert_eq!(processed.direction_at(6), Some(Direction::Buy));
}

#[test]
fn double_reversal_restores_directions() {
    let original = raw(json!({
        "entry": [true, false, true],
        "exit": [false, true, false],
        "direction": ["BUY", null, "SELL"]
    }));
    let once = process(original.clone(), true).unwrap();
    let twice = process(once.into(), true).unwrap();
    assert_eq!(Some(twice.direction), original.direction);
}

#[test]
fn confidence_is_attached_to_directional_entries() {
    let result = raw(json!({
        "entry": [true, true, false],
        "exit": [false, false, true],
        "direction": ["BUY", "BUY", null]
    }));
    let processed = process(result, false).unwrap();
    assert_eq!(processed.confidence.len(), 3);
    assert!(processed.confidence_at(0).is_some());
    assert!(processed.confidence_at(1).unwrap() > processed.confidence_at(0).unwrap());
    assert_eq!(processed.confidence_at(2), None);
}

#[test]
fn pipeline_aligns_to_market_data_and_uses_its_closes() {
    let market = MarketData {
        close: vec![1.00, 1.01, 1.02, 1.03, 1.04, 1.06, 1.05, 1.04],
        ..Default::default()
    };
    let raw_output = json!({
        "entry": [false, false, false, false, false, true],
        "exit": [false, false, false, false, false, false, false, true, true, true]
    });

    let pipeline = SignalPipeline::new(PipelineOptions::default());
    let processed = pipeline.run(&raw_output, Some(&market)).unwrap();
    assert_eq!(processed.bar_count(), 8);
    assert_eq!(processed.exit.len(), 8);
    assert_eq!(processed.direction.len(), 8);
    // 1.06 - 1.00 over five bars
    assert_eq!(processed.direction_at(5), Some(Direction::Buy));
    assert!(processed.auto_generated_direction);
}

#[test]
fn pipeline_reports_non_object_output() {
    let pipeline = SignalPipeline::new(PipelineOptions {
        reverse_signals: true,
        score_confidence: false,
    });
    let err = pipeline.run(&json!("not a dict"), None).unwrap_err();
    assert!(matches!(err, SignalError::InvalidFormat(_)));
}

#[test]
fn pipeline_carries_bar_timestamps() {
    let market: MarketData = serde_json::from_value(json!({
        "close": [1.10, 1.12, 1.11],
        "timestamps": [
            "2024-03-01T00:00:00Z",
            "2024-03-01T01:00:00Z",
            "2024-03-01T02:00:00Z"
        ]
    }))
    .unwrap();
    let raw_output = json!({"entry": [false, true, false], "exit": [false, false, true]});

    let processed = SignalPipeline::default().run(&raw_output, Some(&market)).unwrap();
    assert_eq!(processed.timestamps.len(), 3);
    assert_eq!(processed.timestamp_at(1), market.timestamp_at(1));

    let without_market = SignalPipeline::default().run(&raw_output, None).unwrap();
    assert!(without_market.timestamps.is_empty());
}
