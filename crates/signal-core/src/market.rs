use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-bar OHLCV arrays for one market-data window, aligned by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default, alias = "Open")]
    pub open: Vec<f64>,
    #[serde(default, alias = "High")]
    pub high: Vec<f64>,
    #[serde(default, alias = "Low")]
    pub low: Vec<f64>,
    #[serde(alias = "Close")]
    pub close: Vec<f64>,
    #[serde(default, alias = "Volume")]
    pub volume: Vec<f64>,
    #[serde(default)]
    pub timestamps: Vec<DateTime<Utc>>,
}

impl MarketData {
    pub fn bar_count(&self) -> usize {
        self.close.len()
    }

    /// True when every populated series has one value per bar
    pub fn is_aligned(&self) -> bool {
        let n = self.bar_count();
        [&self.open, &self.high, &self.low, &self.volume]
            .iter()
            .all(|series| series.is_empty() || series.len() == n)
            && (self.timestamps.is_empty() || self.timestamps.len() == n)
    }

    pub fn timestamp_at(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps.get(index).copied()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.close.last().copied()
    }
}
