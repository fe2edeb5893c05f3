//! Spread model configuration
//!
//! All spreads are fractions of mid price (0.002 = 20 bps).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Configuration for the spread model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Spread before volume and volatility adjustments
    pub base_spread: Decimal,
    /// Floor for the total spread; each side is floored at half of this
    pub min_spread: Decimal,
    /// Cap for the total spread
    pub max_spread: Decimal,
    /// Spread added per unit of volatility above the 1% dead zone
    pub volatility_multiplier: Decimal,
    /// How hard inventory imbalance pushes the bid/ask split apart
    pub inventory_skew_multiplier: Decimal,
    /// Price rounding increment for quotes
    pub tick_size: Decimal,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            base_spread: dec!(0.002),          // 20 bps
            min_spread: dec!(0.0005),          // 5 bps
            max_spread: dec!(0.02),            // 200 bps
            volatility_multiplier: dec!(2),
            inventory_skew_multiplier: dec!(0.5),
            tick_size: dec!(0.01),
        }
    }
}

impl SpreadConfig {
    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("base_spread", self.base_spread),
            ("min_spread", self.min_spread),
            ("max_spread", self.max_spread),
            ("volatility_multiplier", self.volatility_multiplier),
            ("inventory_skew_multiplier", self.inventory_skew_multiplier),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.min_spread > self.max_spread {
            return Err(ConfigError::SpreadBounds {
                min: self.min_spread,
                max: self.max_spread,
            });
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(ConfigError::TickSize(self.tick_size));
        }
        Ok(())
    }

    /// Replace only the supplied fields
    pub fn apply(&mut self, update: &SpreadConfigUpdate) {
        if let Some(v) = update.base_spread {
            self.base_spread = v;
        }
        if let Some(v) = update.min_spread {
            self.min_spread = v;
        }
        if let Some(v) = update.max_spread {
            self.max_spread = v;
        }
        if let Some(v) = update.volatility_multiplier {
            self.volatility_multiplier = v;
        }
        if let Some(v) = update.inventory_skew_multiplier {
            self.inventory_skew_multiplier = v;
        }
        if let Some(v) = update.tick_size {
            self.tick_size = v;
        }
    }
}

/// Partial override of [`SpreadConfig`]; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfigUpdate {
    pub base_spread: Option<Decimal>,
    pub min_spread: Option<Decimal>,
    pub max_spread: Option<Decimal>,
    pub volatility_multiplier: Option<Decimal>,
    pub inventory_skew_multiplier: Option<Decimal>,
    pub tick_size: Option<Decimal>,
}
