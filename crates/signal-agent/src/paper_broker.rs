use anyhow::{bail, Result};
use async_trait::async_trait;
use broker_trait::{BrokerAccount, BrokerClient, BrokerOrder, BrokerOrderStatus};
use signal_core::{TradeAction, TradeOrder};
use tokio::sync::Mutex;

/// In-memory broker that accepts orders and records them.
///
/// Nothing is filled and no balance moves; it stands at the seam where a live
/// broker client would sit.
pub struct PaperBroker {
    account_balance: f64,
    currency: String,
    orders: Mutex<Vec<BrokerOrder>>,
}

impl PaperBroker {
    pub fn new(account_balance: f64) -> Self {
        Self {
            account_balance,
            currency: "USD".to_string(),
            orders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BrokerClient for PaperBroker {
    async fn get_account(&self) -> Result<BrokerAccount> {
        let open_trade_count = self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.action != TradeAction::Close)
            .count() as u32;

        Ok(BrokerAccount {
            id: "paper".to_string(),
            currency: self.currency.clone(),
            balance: format!("{:.2}", self.account_balance),
            margin_available: format!("{:.2}", self.account_balance),
            open_trade_count,
        })
    }

    async fn submit_order(&self, order: &TradeOrder) -> Result<BrokerOrder> {
        if order.action != TradeAction::Close && order.units == 0 {
            bail!("Refusing {} order for {} with zero units", order.action, order.symbol);
        }
        if order.action == TradeAction::Sell && order.units > 0 {
            bail!("SELL order for {} must carry negative units", order.symbol);
        }
        if order.stop_loss.is_some() && order.stop_loss_decimal().is_none() {
            bail!("Unparseable stop loss {:?} for {}", order.stop_loss, order.symbol);
        }
        if order.take_profit.is_some() && order.take_profit_decimal().is_none() {
            bail!("Unparseable take profit {:?} for {}", order.take_profit, order.symbol);
        }

        let ack = BrokerOrder::acknowledge(
            uuid::Uuid::new_v4().to_string(),
            order,
            BrokerOrderStatus::Accepted,
        );
        tracing::debug!(
            "Paper order {} accepted: {} {} units of {}",
            ack.id,
            ack.action,
            ack.units,
            ack.symbol
        );
        self.orders.lock().await.push(ack.clone());
        Ok(ack)
    }

    async fn get_orders(&self, limit: Option<usize>) -> Result<Vec<BrokerOrder>> {
        let orders = self.orders.lock().await;
        let skip = limit.map_or(0, |n| orders.len().saturating_sub(n));
        Ok(orders.iter().skip(skip).cloned().collect())
    }

    fn is_paper(&self) -> bool {
        true
    }

    fn broker_name(&self) -> &str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(action: TradeAction, units: i64) -> TradeOrder {
        TradeOrder {
            action,
            symbol: "EUR_USD".to_string(),
            units,
            stop_loss: None,
            take_profit: None,
            strategy_id: "s".to_string(),
            user_id: "u".to_string(),
        }
    }

    #[tokio::test]
    async fn records_accepted_orders() {
        let broker = PaperBroker::new(10_000.0);
        broker.submit_order(&order(TradeAction::Buy, 2000)).await.unwrap();
        broker.submit_order(&order(TradeAction::Close, 0)).await.unwrap();

        let all = broker.get_orders(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].status, BrokerOrderStatus::Accepted);
        assert_eq!(all[0].client_order_id, "s:u");

        let last = broker.get_orders(Some(1)).await.unwrap();
        assert_eq!(last[0].action, TradeAction::Close);

        let account = broker.get_account().await.unwrap();
        assert_eq!(account.open_trade_count, 1);
        assert_eq!(account.balance, "10000.00");
    }

    #[tokio::test]
    async fn rejects_malformed_orders() {
        let broker = PaperBroker::new(10_000.0);
        assert!(broker.submit_order(&order(TradeAction::Buy, 0)).await.is_err());
        assert!(broker.submit_order(&order(TradeAction::Sell, 500)).await.is_err());

        let mut garbled = order(TradeAction::Buy, 1000);
        garbled.stop_loss = Some("n/a".to_string());
        assert!(broker.submit_order(&garbled).await.is_err());

        garbled.stop_loss = Some("0.00400".to_string());
        assert!(broker.submit_order(&garbled).await.is_ok());

        assert_eq!(broker.get_orders(None).await.unwrap().len(), 1);
        assert!(broker.is_paper());
    }
}
