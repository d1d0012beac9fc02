use anyhow::{bail, Context, Result};
use position_sizer::SizingMethod;
use serde::{Deserialize, Serialize};
use signal_processing::PipelineOptions;
use std::env;
use std::path::PathBuf;
use trade_converter::RiskConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    // Inputs / outputs
    pub strategy_result_path: PathBuf,
    pub market_data_path: Option<PathBuf>,
    pub orders_output_path: Option<PathBuf>,

    // Identity
    pub symbol: String,            // EUR_USD
    pub strategy_id: String,
    pub user_id: String,

    // Account and sizing
    pub account_balance: f64,      // 10000
    pub risk_per_trade: f64,       // 2%
    pub max_position_size: u64,    // 100000 units
    pub min_position_size: u64,    // 100 units
    pub sizing_method: SizingMethod,

    // Risk management
    pub stop_loss_pips: f64,       // 40
    pub take_profit_pips: f64,     // 80
    pub max_daily_loss: f64,       // 5%
    pub max_drawdown: f64,         // 10%

    // Signal processing
    pub reverse_signals: bool,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            strategy_result_path: lookup("STRATEGY_RESULT_PATH")
                .map(PathBuf::from)
                .context("STRATEGY_RESULT_PATH not set")?,
            market_data_path: lookup("MARKET_DATA_PATH").map(PathBuf::from),
            orders_output_path: lookup("ORDERS_OUTPUT_PATH").map(PathBuf::from),

            symbol: var("SYMBOL", "EUR_USD"),
            strategy_id: var("STRATEGY_ID", "local-strategy"),
            user_id: var("USER_ID", "local-user"),

            account_balance: var("ACCOUNT_BALANCE", "10000")
                .parse()
                .context("ACCOUNT_BALANCE must be a number")?,
            risk_per_trade: var("RISK_PER_TRADE", "2.0")
                .parse()
                .context("RISK_PER_TRADE must be a number")?,
            max_position_size: var("MAX_POSITION_SIZE", "100000")
                .parse()
                .context("MAX_POSITION_SIZE must be a whole number of units")?,
            min_position_size: var("MIN_POSITION_SIZE", "100")
                .parse()
                .context("MIN_POSITION_SIZE must be a whole number of units")?,
            sizing_method: var("SIZING_METHOD", "fixed").parse()?,

            stop_loss_pips: var("STOP_LOSS_PIPS", "40")
                .parse()
                .context("STOP_LOSS_PIPS must be a number")?,
            take_profit_pips: var("TAKE_PROFIT_PIPS", "80")
                .parse()
                .context("TAKE_PROFIT_PIPS must be a number")?,
            max_daily_loss: var("MAX_DAILY_LOSS", "5.0")
                .parse()
                .context("MAX_DAILY_LOSS must be a number")?,
            max_drawdown: var("MAX_DRAWDOWN", "10.0")
                .parse()
                .context("MAX_DRAWDOWN must be a number")?,

            reverse_signals: var("REVERSE_SIGNALS", "false")
                .parse()
                .context("REVERSE_SIGNALS must be true or false")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            bail!("SYMBOL must not be empty");
        }
        if !(self.account_balance.is_finite() && self.account_balance > 0.0) {
            bail!("ACCOUNT_BALANCE must be positive, got {}", self.account_balance);
        }
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade <= 100.0) {
            bail!("RISK_PER_TRADE must be in (0, 100], got {}", self.risk_per_trade);
        }
        if self.min_position_size > self.max_position_size {
            bail!(
                "MIN_POSITION_SIZE ({}) exceeds MAX_POSITION_SIZE ({})",
                self.min_position_size,
                self.max_position_size
            );
        }
        if self.stop_loss_pips <= 0.0 || self.take_profit_pips <= 0.0 {
            bail!("STOP_LOSS_PIPS and TAKE_PROFIT_PIPS must be positive");
        }
        if self.sizing_method == SizingMethod::StopDistance && self.market_data_path.is_none() {
            bail!("SIZING_METHOD=stop_distance needs bar closes; set MARKET_DATA_PATH");
        }
        Ok(())
    }

    pub fn risk_config(&self) -> RiskConfig {
        RiskConfig {
            risk_per_trade: self.risk_per_trade,
            max_position_size: self.max_position_size,
            min_position_size: self.min_position_size,
            stop_loss: self.stop_loss_pips,
            take_profit: self.take_profit_pips,
            max_daily_loss: self.max_daily_loss,
            max_drawdown: self.max_drawdown,
            sizing_method: self.sizing_method,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            reverse_signals: self.reverse_signals,
            ..Default::default()
        }
    }
}
