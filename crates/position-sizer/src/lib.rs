use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_POSITION_SIZE: u64 = 100_000;
pub const DEFAULT_MIN_POSITION_SIZE: u64 = 100;

/// Pips per unit of price for major pairs
pub const PIPS_PER_PRICE_UNIT: f64 = 10_000.0;

/// Fixed multiplier applied to the risk amount by [`SizingMethod::FixedMultiplier`].
/// It stands in for a pip-value/stop-distance calculation.
pub const FIXED_RISK_MULTIPLIER: f64 = 10.0;

/// Formula used to turn account risk into units.
///
/// The two formulas give different sizes for the same inputs; callers pick one
/// explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// `floor(risk_amount * 10)`, clamped to `[min, max]`
    #[default]
    FixedMultiplier,
    /// `floor(risk_amount / (price * stop_pips / 10000))`, capped at `max` only
    StopDistance,
}

impl std::str::FromStr for SizingMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "fixed_multiplier" => Ok(SizingMethod::FixedMultiplier),
            "stop" | "stop_distance" => Ok(SizingMethod::StopDistance),
            other => bail!("unknown sizing method '{}'", other),
        }
    }
}

/// Parameter bag supplied per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizingConfig {
    pub account_balance: f64,
    /// Percent of the balance risked per trade (2.0 = 2%)
    pub risk_per_trade: f64,
    pub max_position_size: u64,
    pub min_position_size: u64,
}

/// Position sizer bounded by minimum and maximum units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSizer {
    pub min_position_size: u64,
    pub max_position_size: u64,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self {
            min_position_size: DEFAULT_MIN_POSITION_SIZE,
            max_position_size: DEFAULT_MAX_POSITION_SIZE,
        }
    }
}

impl PositionSizer {
    pub fn new(min_position_size: u64, max_position_size: u64) -> Result<Self> {
        if max_position_size == 0 {
            bail!("max_position_size must be positive");
        }
        if min_position_size > max_position_size {
            bail!("min_position_size must be <= max_position_size");
        }

        Ok(Self {
            min_position_size,
            max_position_size,
        })
    }

    /// Fixed-multiplier sizing. Returns 0 ("do not trade") for non-positive or
    /// non-finite inputs.
    pub fn calculate(&self, account_balance: f64, risk_per_trade: f64) -> u64 {
        calculate_position_size(
            account_balance,
            risk_per_trade,
            self.max_position_size,
            self.min_position_size,
        )
    }

    /// Stop-distance sizing. Not interchangeable with [`PositionSizer::calculate`].
    pub fn calculate_with_stop_loss(
        &self,
        account_balance: f64,
        risk_per_trade: f64,
        stop_loss_pips: f64,
        current_price: f64,
    ) -> u64 {
        calculate_position_size_with_stop_loss(
            account_balance,
            risk_per_trade,
            stop_loss_pips,
            current_price,
            self.max_position_size,
        )
    }

    /// Size with an explicitly chosen formula
    pub fn calculate_with(
        &self,
        method: SizingMethod,
        account_balance: f64,
        risk_per_trade: f64,
        stop_loss_pips: f64,
        current_price: Option<f64>,
    ) -> Result<u64> {
        match method {
            SizingMethod::FixedMultiplier => Ok(self.calculate(account_balance, risk_per_trade)),
            SizingMethod::StopDistance => {
                let Some(price) = current_price else {
                    bail!("stop-distance sizing requires a current price");
                };
                Ok(self.calculate_with_stop_loss(
                    account_balance,
                    risk_per_trade,
                    stop_loss_pips,
                    price,
                ))
            }
        }
    }
}

fn risk_amount(account_balance: f64, risk_per_trade: f64) -> Option<f64> {
    let usable = account_balance.is_finite()
        && risk_per_trade.is_finite()
        && account_balance > 0.0
        && risk_per_trade > 0.0;
    usable.then(|| account_balance * (risk_per_trade / 100.0))
}

/// `floor(balance * risk% * 10)` clamped to `[min, max]`.
pub fn calculate_position_size(
    account_balance: f64,
    risk_per_trade: f64,
    max_position_size: u64,
    min_position_size: u64,
) -> u64 {
    let Some(risk_amount) = risk_amount(account_balance, risk_per_trade) else {
        log::warn!(
            "Position sizing skipped: balance={}, risk={}%",
            account_balance,
            risk_per_trade
        );
        return 0;
    };

    let naive = (risk_amount * FIXED_RISK_MULTIPLIER).floor() as u64;
    let size = naive.max(min_position_size).min(max_position_size);

    log::debug!(
        "Position sizing: account={}, risk={}%, size={}",
        account_balance,
        risk_per_trade,
        size
    );

    size
}

/// `floor(risk_amount / (price * stop_pips / 10000))` capped at `max`; no floor clamp.
pub fn calculate_position_size_with_stop_loss(
    account_balance: f64,
    risk_per_trade: f64,
    stop_loss_pips: f64,
    current_price: f64,
    max_position_size: u64,
) -> u64 {
    let Some(risk_amount) = risk_amount(account_balance, risk_per_trade) else {
        return 0;
    };

    let stop_loss_amount = current_price * (stop_loss_pips / PIPS_PER_PRICE_UNIT);
    if !stop_loss_amount.is_finite() || stop_loss_amount <= 0.0 {
        log::warn!(
            "Stop-distance sizing skipped: price={}, stop={} pips",
            current_price,
            stop_loss_pips
        );
        return 0;
    }

    let size = (risk_amount / stop_loss_amount).floor() as u64;
    size.min(max_position_size)
}

/// Accept a size only inside the configured bounds and above zero
pub fn validate_position_size(position_size: u64, config: &PositionSizingConfig) -> bool {
    position_size >= config.min_position_size
        && position_size <= config.max_position_size
        && position_size > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_multiplier_within_bounds() {
        // risk = 100, naive = floor(100 * 10) = 1000
        assert_eq!(calculate_position_size(10_000.0, 1.0, 100_000, 100), 1000);
    }

    #[test]
    fn test_fixed_multiplier_clamps() {
        assert_eq!(calculate_position_size(10.0, 1.0, 100_000, 100), 100);
        assert_eq!(calculate_position_size(10_000_000.0, 5.0, 100_000, 100), 100_000);
    }

    #[test]
    fn test_invalid_inputs_size_to_zero() {
        assert_eq!(calculate_position_size(0.0, 2.0, 100_000, 100), 0);
        assert_eq!(calculate_position_size(-5_000.0, 2.0, 100_000, 100), 0);
        assert_eq!(calculate_position_size(f64::NAN, 2.0, 100_000, 100), 0);
        assert_eq!(calculate_position_size(10_000.0, f64::INFINITY, 100_000, 100), 0);
    }

    #[test]
    fn test_stop_distance_sizing() {
        // risk = 200, stop amount = 1.1 * 0.004 = 0.0044 -> 45454 units
        let size = calculate_position_size_with_stop_loss(10_000.0, 2.0, 40.0, 1.1, 100_000);
        assert_eq!(size, 45_454);

        let capped = calculate_position_size_with_stop_loss(10_000.0, 2.0, 4.0, 1.1, 100_000);
        assert_eq!(capped, 100_000);
    }

    #[test]
    fn test_stop_distance_has_no_floor_clamp() {
        let size = calculate_position_size_with_stop_loss(100.0, 0.01, 40.0, 150.0, 100_000);
        assert!(size < DEFAULT_MIN_POSITION_SIZE);
    }

    #[test]
    fn test_zero_stop_distance_sizes_to_zero() {
        assert_eq!(
            calculate_position_size_with_stop_loss(10_000.0, 2.0, 0.0, 1.1, 100_000),
            0
        );
    }

    #[test]
    fn test_formulas_disagree() {
        let sizer = PositionSizer::default();
        let fixed = sizer.calculate(10_000.0, 2.0);
        let stop = sizer.calculate_with_stop_loss(10_000.0, 2.0, 40.0, 1.1);
        assert_ne!(fixed, stop);
    }

    #[test]
    fn test_method_selection() {
        let sizer = PositionSizer::default();
        assert_eq!(
            sizer
                .calculate_with(SizingMethod::FixedMultiplier, 10_000.0, 2.0, 40.0, None)
                .unwrap(),
            2000
        );
        assert!(sizer
            .calculate_with(SizingMethod::StopDistance, 10_000.0, 2.0, 40.0, None)
            .is_err());
        assert_eq!("stop_distance".parse::<SizingMethod>().unwrap(), SizingMethod::StopDistance);
    }

    #[test]
    fn test_constructor_rejects_inverted_bounds() {
        assert!(PositionSizer::new(500, 100).is_err());
        assert!(PositionSizer::new(0, 0).is_err());
        assert!(PositionSizer::new(100, 100).is_ok());
    }

    #[test]
    fn test_validate_position_size() {
        let config = PositionSizingConfig {
            account_balance: 10_000.0,
            risk_per_trade: 2.0,
            max_position_size: 100_000,
            min_position_size: 100,
        };
        assert!(validate_position_size(2000, &config));
        assert!(!validate_position_size(50, &config));
        assert!(!validate_position_size(200_000, &config));

        let no_floor = PositionSizingConfig {
            min_position_size: 0,
            ..config
        };
        assert!(!validate_position_size(0, &no_floor));
    }

    #[test]
    fn test_risk_amount_scales_with_balance() {
        let risk = risk_amount(25_000.0, 2.0).unwrap();
        assert_relative_eq!(risk, 500.0, epsilon = 1e-9);
    }
}
