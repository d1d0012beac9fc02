use serde::{Deserialize, Serialize};
use serde_json::Value;
use signal_core::{MarketData, ProcessedSignals, SignalError, StrategyExecutionResult};

use crate::alignment::align_to_bars;
use crate::processor::{process_with_options, ProcessOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    #[serde(default)]
    pub reverse_signals: bool,
    /// Run the advisory confidence pass
    #[serde(default = "default_score_confidence")]
    pub score_confidence: bool,
}

fn default_score_confidence() -> bool {
    true
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            reverse_signals: false,
            score_confidence: default_score_confidence(),
        }
    }
}

/// Runs raw strategy output through normalization and signal processing.
///
/// Holds no state between runs; each call processes one market-data window.
#[derive(Debug, Clone, Default)]
pub struct SignalPipeline {
    options: PipelineOptions,
}

impl SignalPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Normalize an untrusted strategy object and process it.
    pub fn run(
        &self,
        raw: &Value,
        market: Option<&MarketData>,
    ) -> Result<ProcessedSignals, SignalError> {
        let result = StrategyExecutionResult::from_value(raw)?;
        self.run_result(result, market)
    }

    pub fn run_result(
        &self,
        mut result: StrategyExecutionResult,
        market: Option<&MarketData>,
    ) -> Result<ProcessedSignals, SignalError> {
        if let Some(market) = market {
            if !market.is_aligned() {
                tracing::warn!("Market data series are not aligned; using close length as bar count");
            }
            if result.close.is_empty() {
                result.close = market.close.clone();
            }
            if result.bar_count() != market.bar_count() {
                tracing::debug!(
                    "Aligning {} signal bars to {} market bars",
                    result.bar_count(),
                    market.bar_count()
                );
            }
            align_to_bars(&mut result, market.bar_count());
        }

        let mut processed = process_with_options(
            result,
            ProcessOptions {
                reverse_signals: self.options.reverse_signals,
                score_confidence: self.options.score_confidence,
            },
        )?;

        if let Some(market) = market {
            processed.timestamps = (0..processed.bar_count())
                .map_while(|i| market.timestamp_at(i))
                .collect();
            if !processed.timestamps.is_empty() && processed.timestamps.len() < processed.bar_count() {
                tracing::warn!(
                    "Market data has {} timestamps for {} bars; later bars use the wall clock",
                    processed.timestamps.len(),
                    processed.bar_count()
                );
            }
        }

        Ok(processed)
    }

    /// Like [`SignalPipeline::run`], but folds a failure into the terminal shape.
    pub fn run_or_terminal(&self, raw: &Value, market: Option<&MarketData>) -> ProcessedSignals {
        self.run(raw, market).unwrap_or_else(|err| {
            tracing::warn!("Signal pipeline stopped: {}", err);
            ProcessedSignals::terminal(&err)
        })
    }
}
