use anyhow::{Context, Result};
use broker_trait::BrokerClient;
use serde::Serialize;
use signal_core::{MarketData, ProcessedSignals, TradeOrder};
use signal_processing::SignalPipeline;
use std::path::Path;
use trade_converter::{OrderRiskCheck, SignalBridge};

use crate::config::AgentConfig;

/// What one pass over a strategy result produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub signals: ProcessedSignals,
    pub orders: Vec<TradeOrder>,
    pub risk_checks: Vec<OrderRiskCheck>,
    pub submitted: usize,
}

impl RunReport {
    pub fn is_terminal(&self) -> bool {
        self.signals.is_terminal()
    }
}

async fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

async fn load_market_data(path: &Path) -> Result<MarketData> {
    let value = read_json(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("{} is not an OHLCV object", path.display()))
}

/// Process one strategy result and hand the resulting orders to `broker`.
///
/// Orders failing the pre-trade risk check are reported but not submitted.
pub async fn run_once(config: &AgentConfig, broker: &dyn BrokerClient) -> Result<RunReport> {
    let raw = read_json(&config.strategy_result_path).await?;
    let market = match &config.market_data_path {
        Some(path) => {
            let market = load_market_data(path).await?;
            tracing::debug!(
                "Loaded {} bars of market data, last close {:?}",
                market.bar_count(),
                market.latest_close()
            );
            Some(market)
        }
        None => None,
    };

    let pipeline = SignalPipeline::new(config.pipeline_options());
    let signals = pipeline.run_or_terminal(&raw, market.as_ref());

    if let Some(error) = &signals.error {
        tracing::error!("Strategy result rejected: {}", error);
        return Ok(RunReport {
            signals,
            orders: Vec::new(),
            risk_checks: Vec::new(),
            submitted: 0,
        });
    }

    tracing::info!(
        "Signals processed: {} bars, {} entries ({} BUY / {} SELL), auto-generated direction: {}",
        signals.bar_count(),
        signals.signal_stats.total_entries,
        signals.signal_stats.buy_signals,
        signals.signal_stats.sell_signals,
        signals.auto_generated_direction
    );
    for warning in &signals.warnings {
        tracing::warn!("{}", warning);
    }

    let bridge = SignalBridge::new(
        config.strategy_id.clone(),
        config.user_id.clone(),
        config.account_balance,
        config.risk_config(),
    );
    let orders = bridge
        .convert_backtest_signals(&signals, &config.symbol)
        .context("Failed to convert signals into orders")?;

    let mut risk_checks = Vec::with_capacity(orders.len());
    let mut submitted = 0;
    for order in &orders {
        let check = bridge.validate_order_risk(order);
        if !check.is_valid {
            tracing::warn!(
                "Skipping {} {} ({} units): {}",
                order.action,
                order.symbol,
                order.units,
                check.warnings.join("; ")
            );
            risk_checks.push(check);
            continue;
        }
        risk_checks.push(check);

        match broker.submit_order(order).await {
            Ok(ack) => {
                submitted += 1;
                tracing::debug!("{} accepted order {}", broker.broker_name(), ack.id);
            }
            Err(e) => tracing::warn!("{} rejected order: {}", broker.broker_name(), e),
        }
    }

    tracing::info!(
        "Submitted {}/{} orders to {}{}",
        submitted,
        orders.len(),
        broker.broker_name(),
        if broker.is_paper() { " (paper)" } else { "" }
    );

    Ok(RunReport {
        signals,
        orders,
        risk_checks,
        submitted,
    })
}

pub async fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Run report written to {}", path.display());
    Ok(())
}
