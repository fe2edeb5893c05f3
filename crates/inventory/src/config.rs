//! Inventory ledger configuration

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Position limits and rebalancing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Position the ledger steers back toward
    pub target_inventory: Decimal,
    /// Hard upper bound (long limit)
    pub max_inventory: Decimal,
    /// Hard lower bound (short limit, usually negative)
    pub min_inventory: Decimal,
    /// Rebalance when |current - target| / (max - min) exceeds this
    pub rebalance_threshold: Decimal,
    /// Steepness of the tanh skew factor
    pub skew_sensitivity: Decimal,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            target_inventory: Decimal::ZERO,
            max_inventory: dec!(1000),
            min_inventory: dec!(-1000),
            rebalance_threshold: dec!(0.3),
            skew_sensitivity: dec!(2),
        }
    }
}

impl InventoryConfig {
    /// Width of the allowed position band
    pub fn range(&self) -> Decimal {
        self.max_inventory - self.min_inventory
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_inventory >= self.max_inventory {
            return Err(ConfigError::InventoryBounds {
                min: self.min_inventory,
                max: self.max_inventory,
            });
        }
        if self.target_inventory < self.min_inventory || self.target_inventory > self.max_inventory
        {
            return Err(ConfigError::TargetOutOfBounds {
                target: self.target_inventory,
                min: self.min_inventory,
                max: self.max_inventory,
            });
        }
        if self.rebalance_threshold < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "rebalance_threshold",
                value: self.rebalance_threshold,
            });
        }
        if self.skew_sensitivity < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "skew_sensitivity",
                value: self.skew_sensitivity,
            });
        }
        Ok(())
    }

    /// Replace only the supplied fields
    pub fn apply(&mut self, update: &InventoryConfigUpdate) {
        if let Some(v) = update.target_inventory {
            self.target_inventory = v;
        }
        if let Some(v) = update.max_inventory {
            self.max_inventory = v;
        }
        if let Some(v) = update.min_inventory {
            self.min_inventory = v;
        }
        if let Some(v) = update.rebalance_threshold {
            self.rebalance_threshold = v;
        }
        if let Some(v) = update.skew_sensitivity {
            self.skew_sensitivity = v;
        }
    }
}

/// Partial override of [`InventoryConfig`]; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfigUpdate {
    pub target_inventory: Option<Decimal>,
    pub max_inventory: Option<Decimal>,
    pub min_inventory: Option<Decimal>,
    pub rebalance_threshold: Option<Decimal>,
    pub skew_sensitivity: Option<Decimal>,
}
