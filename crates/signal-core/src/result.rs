use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{Direction, DirectionLabel, SignalError};

/// Keys that may carry the per-bar direction array, in lookup order.
pub const DIRECTION_KEYS: [&str; 3] = ["direction", "entry_type", "trade_direction"];

const CLOSE_KEYS: [&str; 2] = ["close", "Close"];

const RESERVED_KEYS: [&str; 10] = [
    "entry",
    "exit",
    "direction",
    "entry_type",
    "trade_direction",
    "close",
    "Close",
    "auto_generated_direction",
    "inferred_bars",
    "error",
];

/// Output of running a strategy against a market-data window, normalized into
/// one fixed shape.
///
/// `entry`, `exit` and `direction` stay optional because the raw strategy output
/// is untrusted; the validator decides whether their absence is fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyExecutionResult {
    pub entry: Option<Vec<bool>>,
    pub exit: Option<Vec<bool>>,
    pub direction: Option<Vec<DirectionLabel>>,
    #[serde(default)]
    pub close: Vec<f64>,
    /// Auxiliary numeric series (moving averages, RSI, ...) keyed by name
    #[serde(default)]
    pub indicators: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub auto_generated_direction: bool,
    /// Bars whose direction was inferred instead of authored by the strategy
    #[serde(default)]
    pub inferred_bars: Vec<usize>,
}

impl StrategyExecutionResult {
    /// Build a result from fully specified signal arrays.
    pub fn new(entry: Vec<bool>, exit: Vec<bool>, direction: Option<Vec<DirectionLabel>>) -> Self {
        Self {
            entry: Some(entry),
            exit: Some(exit),
            direction,
            ..Default::default()
        }
    }

    /// Normalize a raw strategy-execution object.
    ///
    /// Direction aliases are resolved here once; nothing downstream looks at
    /// `entry_type` or `trade_direction`.
    pub fn from_value(value: &Value) -> Result<Self, SignalError> {
        let obj = value.as_object().ok_or_else(|| {
            SignalError::InvalidFormat("Strategy must return a dictionary".to_string())
        })?;

        let entry = obj.get("entry").and_then(Value::as_array).map(|a| truthy_array(a));
        let exit = obj.get("exit").and_then(Value::as_array).map(|a| truthy_array(a));

        let direction = DIRECTION_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .map(|cells| cells.iter().map(DirectionLabel::from_json).collect());

        let close = CLOSE_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .map(|a| numeric_array(a))
            .unwrap_or_default();

        let indicators = collect_indicators(obj);

        let auto_generated_direction = obj
            .get("auto_generated_direction")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let inferred_bars = obj
            .get("inferred_bars")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_u64)
                    .map(|i| i as usize)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            entry,
            exit,
            direction,
            close,
            indicators,
            auto_generated_direction,
            inferred_bars,
        })
    }

    /// Number of bars covered by the entry array
    pub fn bar_count(&self) -> usize {
        self.entry.as_ref().map_or(0, Vec::len)
    }

    /// A direction array exists and is not empty
    pub fn has_direction(&self) -> bool {
        self.direction.as_ref().is_some_and(|d| !d.is_empty())
    }

    pub fn is_entry(&self, index: usize) -> bool {
        self.entry
            .as_ref()
            .and_then(|e| e.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_exit(&self, index: usize) -> bool {
        self.exit
            .as_ref()
            .and_then(|e| e.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn direction_at(&self, index: usize) -> Option<Direction> {
        self.direction
            .as_ref()
            .and_then(|d| d.get(index))
            .and_then(DirectionLabel::as_direction)
    }

    /// Entry bars that do not carry a BUY or SELL
    pub fn unresolved_entries(&self) -> Vec<usize> {
        let Some(entry) = &self.entry else {
            return Vec::new();
        };
        entry
            .iter()
            .enumerate()
            .filter(|(i, &is_entry)| is_entry && self.direction_at(*i).is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// First indicator series present under any of `keys`
    pub fn indicator(&self, keys: &[&str]) -> Option<&[f64]> {
        keys.iter()
            .find_map(|key| self.indicators.get(*key))
            .map(Vec::as_slice)
    }

    pub fn with_close(mut self, close: Vec<f64>) -> Self {
        self.close = close;
        self
    }

    pub fn with_indicator(mut self, name: impl Into<String>, series: Vec<f64>) -> Self {
        self.indicators.insert(name.into(), series);
        self
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

fn truthy_array(values: &[Value]) -> Vec<bool> {
    values.iter().map(truthy).collect()
}

fn numeric_array(values: &[Value]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.as_f64().unwrap_or(f64::NAN))
        .collect()
}

fn collect_indicators(obj: &Map<String, Value>) -> BTreeMap<String, Vec<f64>> {
    obj.iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let cells = value.as_array()?;
            let numeric = !cells.is_empty()
                && cells.iter().all(|c| c.is_number() || c.is_null())
                && cells.iter().any(Value::is_number);
            numeric.then(|| (key.clone(), numeric_array(cells)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_direction_aliases_in_order() {
        let raw = json!({
            "entry": [true, false],
            "exit": [false, true],
            "trade_direction": ["SELL", null],
            "entry_type": ["BUY", null]
        });
        let result = StrategyExecutionResult::from_value(&raw).unwrap();
        assert_eq!(result.direction_at(0), Some(Direction::Buy));
    }

    #[test]
    fn rejects_non_object_output() {
        let err = StrategyExecutionResult::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, SignalError::InvalidFormat(_)));
    }

    #[test]
    fn coerces_entry_cells_by_truthiness() {
        let raw = json!({"entry": [1, 0, "x", null, true], "exit": []});
        let result = StrategyExecutionResult::from_value(&raw).unwrap();
        assert_eq!(result.entry, Some(vec![true, false, true, false, true]));
    }

    #[test]
    fn non_array_entry_is_treated_as_missing() {
        let raw = json!({"entry": "yes", "exit": [false]});
        let result = StrategyExecutionResult::from_value(&raw).unwrap();
        assert!(result.entry.is_none());
        assert_eq!(result.exit, Some(vec![false]));
    }

    #[test]
    fn keeps_numeric_series_as_indicators() {
        let raw = json!({
            "entry": [false, true],
            "exit": [false, false],
            "Close": [1.1, 1.2],
            "short_ema": [null, 1.15],
            "label": "ema-cross",
            "flags": [true, false]
        });
        let result = StrategyExecutionResult::from_value(&raw).unwrap();
        assert_eq!(result.close, vec![1.1, 1.2]);
        let ema = result.indicator(&["short_ema"]).unwrap();
        assert!(ema[0].is_nan());
        assert_eq!(ema[1], 1.15);
        assert!(!result.indicators.contains_key("label"));
        assert!(!result.indicators.contains_key("flags"));
    }

    #[test]
    fn lists_entries_without_direction() {
        let result = StrategyExecutionResult::new(
            vec![true, true, false],
            vec![false, false, false],
            Some(vec![DirectionLabel::Buy, DirectionLabel::Flat, DirectionLabel::Flat]),
        );
        assert_eq!(result.unresolved_entries(), vec![1]);
    }
}
