use anyhow::Result;
use broker_trait::BrokerClient;

mod config;
mod paper_broker;
mod runner;

use config::AgentConfig;
use paper_broker::PaperBroker;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    tracing::info!("Starting signal agent");

    // 2. Load configuration
    let config = AgentConfig::from_env()?;
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  Strategy result: {}", config.strategy_result_path.display());
    tracing::info!("  Symbol: {}", config.symbol);
    tracing::info!("  Account balance: {}", config.account_balance);
    tracing::info!("  Risk per trade: {}%", config.risk_per_trade);
    tracing::info!(
        "  Position size: {}..={} units ({:?})",
        config.min_position_size,
        config.max_position_size,
        config.sizing_method
    );
    tracing::info!(
        "  Stop/target: {}/{} pips",
        config.stop_loss_pips,
        config.take_profit_pips
    );
    if config.reverse_signals {
        tracing::info!("  Reverse signals: enabled");
    }

    // 3. Broker (paper only)
    let broker = PaperBroker::new(config.account_balance);
    let account = broker.get_account().await?;
    tracing::info!(
        "Broker ready: {} account {} ({} {})",
        broker.broker_name(),
        account.id,
        account.balance,
        account.currency
    );

    // 4. Run
    let report = runner::run_once(&config, &broker).await?;

    if let Some(path) = &config.orders_output_path {
        runner::write_report(&report, path).await?;
    }

    if report.is_terminal() {
        anyhow::bail!(
            "Strategy result rejected: {}",
            report.signals.error.as_deref().unwrap_or("unknown error")
        );
    }

    tracing::info!(
        "Done: {} orders created, {} submitted",
        report.orders.len(),
        report.submitted
    );
    Ok(())
}
