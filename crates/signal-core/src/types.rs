use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Resolved trading side of an entry signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Swap BUY and SELL. Applying it twice yields the original side.
    pub fn flip(self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of a per-bar direction array as the strategy produced it.
///
/// Strategies are untrusted, so anything that is not BUY, SELL or an explicit
/// "no direction" marker is kept verbatim in `Unrecognized` for the validator
/// to report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirectionLabel {
    Buy,
    Sell,
    #[default]
    Flat,
    Unrecognized(String),
}

impl DirectionLabel {
    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            DirectionLabel::Buy => Some(Direction::Buy),
            DirectionLabel::Sell => Some(Direction::Sell),
            _ => None,
        }
    }

    /// Flip BUY/SELL; flat and unrecognized cells pass through untouched.
    pub fn flipped(&self) -> Self {
        match self {
            DirectionLabel::Buy => DirectionLabel::Sell,
            DirectionLabel::Sell => DirectionLabel::Buy,
            other => other.clone(),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DirectionLabel::Flat,
            serde_json::Value::String(s) => match s.as_str() {
                "BUY" => DirectionLabel::Buy,
                "SELL" => DirectionLabel::Sell,
                "None" | "NONE" | "none" => DirectionLabel::Flat,
                _ => DirectionLabel::Unrecognized(s.clone()),
            },
            other => DirectionLabel::Unrecognized(other.to_string()),
        }
    }
}

impl From<Direction> for DirectionLabel {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Buy => DirectionLabel::Buy,
            Direction::Sell => DirectionLabel::Sell,
        }
    }
}

impl From<Option<Direction>> for DirectionLabel {
    fn from(direction: Option<Direction>) -> Self {
        direction.map(DirectionLabel::from).unwrap_or(DirectionLabel::Flat)
    }
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionLabel::Buy => f.write_str("BUY"),
            DirectionLabel::Sell => f.write_str("SELL"),
            DirectionLabel::Flat => f.write_str("None"),
            DirectionLabel::Unrecognized(s) => f.write_str(s),
        }
    }
}

impl Serialize for DirectionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DirectionLabel::Buy => serializer.serialize_str("BUY"),
            DirectionLabel::Sell => serializer.serialize_str("SELL"),
            DirectionLabel::Flat => serializer.serialize_none(),
            DirectionLabel::Unrecognized(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for DirectionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(DirectionLabel::from_json(&value))
    }
}

/// Action carried by a trade signal or order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Close,
}

impl TradeAction {
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Buy => TradeAction::Buy,
            Direction::Sell => TradeAction::Sell,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            TradeAction::Buy => Some(Direction::Buy),
            TradeAction::Sell => Some(Direction::Sell),
            TradeAction::Close => None,
        }
    }

    /// Apply the broker sign convention: short orders carry negative units.
    pub fn signed_units(&self, magnitude: u64) -> i64 {
        let units = i64::try_from(magnitude).unwrap_or(i64::MAX);
        match self {
            TradeAction::Sell => -units,
            TradeAction::Buy | TradeAction::Close => units,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("BUY"),
            TradeAction::Sell => f.write_str("SELL"),
            TradeAction::Close => f.write_str("CLOSE"),
        }
    }
}

/// Entry counts joined with their resolved direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    pub total_entries: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
}

/// A single point-in-time trading intent derived from one validated entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    pub action: TradeAction,
    pub symbol: String,
    pub direction: Option<Direction>,
    pub confidence: f64, // 0.0 to 1.0
    pub timestamp: DateTime<Utc>,
}

impl TradeSignal {
    pub fn entry(symbol: impl Into<String>, direction: Direction, confidence: f64) -> Self {
        Self {
            action: TradeAction::from_direction(direction),
            symbol: symbol.into(),
            direction: Some(direction),
            confidence,
            timestamp: Utc::now(),
        }
    }

    /// Stamp the signal with its bar time instead of the wall clock
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn close(symbol: impl Into<String>) -> Self {
        Self {
            action: TradeAction::Close,
            symbol: symbol.into(),
            direction: None,
            confidence: 1.0,
            timestamp: Utc::now(),
        }
    }
}

/// The unit handed to a broker-execution collaborator. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrder {
    pub action: TradeAction,
    pub symbol: String,
    pub units: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<String>,
    pub strategy_id: String,
    pub user_id: String,
}

impl TradeOrder {
    pub fn stop_loss_decimal(&self) -> Option<Decimal> {
        self.stop_loss
            .as_ref()
            .and_then(|s| Decimal::from_str(s).ok())
    }

    pub fn take_profit_decimal(&self) -> Option<Decimal> {
        self.take_profit
            .as_ref()
            .and_then(|s| Decimal::from_str(s).ok())
    }

    /// Unsigned size regardless of side
    pub fn magnitude(&self) -> u64 {
        self.units.unsigned_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direction_labels_parse_aliases_for_none() {
        assert_eq!(DirectionLabel::from_json(&json!(null)), DirectionLabel::Flat);
        assert_eq!(DirectionLabel::from_json(&json!("None")), DirectionLabel::Flat);
        assert_eq!(DirectionLabel::from_json(&json!("NONE")), DirectionLabel::Flat);
        assert_eq!(DirectionLabel::from_json(&json!("BUY")), DirectionLabel::Buy);
        assert_eq!(
            DirectionLabel::from_json(&json!("HOLD")),
            DirectionLabel::Unrecognized("HOLD".to_string())
        );
        assert_eq!(
            DirectionLabel::from_json(&json!(1)),
            DirectionLabel::Unrecognized("1".to_string())
        );
    }

    #[test]
    fn flat_label_serializes_as_null() {
        let labels = vec![DirectionLabel::Flat, DirectionLabel::Buy, DirectionLabel::Sell];
        let json = serde_json::to_value(&labels).unwrap();
        assert_eq!(json, json!([null, "BUY", "SELL"]));
    }

    #[test]
    fn sell_units_are_negative() {
        assert_eq!(TradeAction::Sell.signed_units(1000), -1000);
        assert_eq!(TradeAction::Buy.signed_units(1000), 1000);
        assert_eq!(TradeAction::Close.signed_units(0), 0);
    }

    #[test]
    fn order_levels_parse_as_decimals() {
        let order = TradeOrder {
            action: TradeAction::Buy,
            symbol: "EUR_USD".to_string(),
            units: 1000,
            stop_loss: Some("1.09600".to_string()),
            take_profit: Some("not-a-price".to_string()),
            strategy_id: "s1".to_string(),
            user_id: "u1".to_string(),
        };
        assert_eq!(order.stop_loss_decimal(), Some(Decimal::new(109600, 5)));
        assert_eq!(order.take_profit_decimal(), None);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["stopLoss"], "1.09600");
        assert_eq!(json["strategyId"], "s1");
    }
}
