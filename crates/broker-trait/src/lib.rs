use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signal_core::{TradeAction, TradeOrder};

// ---------------------------------------------------------------------------
// Broker-side records (broker-agnostic)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerAccount {
    pub id: String,
    pub currency: String,
    pub balance: String,
    pub margin_available: String,
    pub open_trade_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerOrderStatus {
    Accepted,
    Filled,
    Rejected,
}

/// A [`TradeOrder`] as acknowledged by the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerOrder {
    pub id: String,
    pub client_order_id: String,
    pub created_at: DateTime<Utc>,
    pub symbol: String,
    pub action: TradeAction,
    pub units: i64,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
    pub status: BrokerOrderStatus,
}

impl BrokerOrder {
    /// Acknowledgement for `order` under the broker-assigned `id`.
    pub fn acknowledge(id: impl Into<String>, order: &TradeOrder, status: BrokerOrderStatus) -> Self {
        Self {
            id: id.into(),
            client_order_id: format!("{}:{}", order.strategy_id, order.user_id),
            created_at: Utc::now(),
            symbol: order.symbol.clone(),
            action: order.action,
            units: order.units,
            stop_loss: order.stop_loss.clone(),
            take_profit: order.take_profit.clone(),
            status,
        }
    }
}

// ---------------------------------------------------------------------------
// Broker trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Get account information (balance, margin, etc.)
    async fn get_account(&self) -> Result<BrokerAccount>;

    /// Submit an order produced by the signal pipeline
    async fn submit_order(&self, order: &TradeOrder) -> Result<BrokerOrder>;

    /// Get recent orders, newest last
    async fn get_orders(&self, limit: Option<usize>) -> Result<Vec<BrokerOrder>>;

    /// Whether this is a paper/simulated account
    fn is_paper(&self) -> bool;

    /// Broker name for logging
    fn broker_name(&self) -> &str;
}
