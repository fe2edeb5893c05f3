//! Market maker configuration
//!
//! Composes the spread and inventory configs with order sizing, tick sizes,
//! history retention and the pool fee.

use kestrel_inventory::{InventoryConfig, InventoryConfigUpdate};
use kestrel_spread::{SpreadConfig, SpreadConfigUpdate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{MarketMakerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakerConfig {
    /// Instrument being quoted
    pub symbol: String,
    /// Base size per side before inventory scaling
    pub order_size: Decimal,
    pub min_order_size: Decimal,
    pub max_order_size: Decimal,
    /// Order prices are rounded to this (buys down, sells up)
    pub price_tick_size: Decimal,
    /// Order sizes are rounded down to this
    pub size_tick_size: Decimal,
    /// Fee charged on fill notional; negative for rebates
    pub maker_fee_rate: Decimal,
    /// Trade history length that triggers eviction
    pub history_capacity: usize,
    /// Trades kept after an eviction
    pub history_retain: usize,
    /// Swap fee of the owned liquidity pool
    pub pool_fee: Decimal,
    pub spread: SpreadConfig,
    pub inventory: InventoryConfig,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC-USD".to_string(),
            order_size: dec!(1),
            min_order_size: dec!(0.01),
            max_order_size: dec!(100),
            price_tick_size: dec!(0.01),
            size_tick_size: dec!(0.0001),
            maker_fee_rate: Decimal::ZERO,
            history_capacity: 1000,
            history_retain: 500,
            pool_fee: dec!(0.003), // 30 bps
            spread: SpreadConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }
}

impl MarketMakerConfig {
    /// Check this config and both nested configs
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() {
            return Err(invalid("symbol must not be empty"));
        }
        if self.order_size <= Decimal::ZERO {
            return Err(invalid(format!("order_size must be positive, got {}", self.order_size)));
        }
        if self.min_order_size < Decimal::ZERO || self.min_order_size > self.max_order_size {
            return Err(invalid(format!(
                "order size bounds [{}, {}] are inconsistent",
                self.min_order_size, self.max_order_size
            )));
        }
        if self.price_tick_size <= Decimal::ZERO || self.size_tick_size <= Decimal::ZERO {
            return Err(invalid(format!(
                "tick sizes must be positive, got price={} size={}",
                self.price_tick_size, self.size_tick_size
            )));
        }
        if self.maker_fee_rate.abs() >= Decimal::ONE {
            return Err(invalid(format!(
                "maker_fee_rate {} outside (-1, 1)",
                self.maker_fee_rate
            )));
        }
        if self.history_capacity == 0 || self.history_retain > self.history_capacity {
            return Err(invalid(format!(
                "history_retain ({}) must not exceed a non-zero history_capacity ({})",
                self.history_retain, self.history_capacity
            )));
        }
        if self.pool_fee < Decimal::ZERO || self.pool_fee >= Decimal::ONE {
            return Err(invalid(format!("pool_fee {} outside [0, 1)", self.pool_fee)));
        }

        self.spread.validate()?;
        self.inventory.validate()?;
        Ok(())
    }

    /// Replace only the supplied fields, including nested ones
    pub fn apply(&mut self, update: &MarketMakerConfigUpdate) {
        if let Some(symbol) = &update.symbol {
            self.symbol = symbol.clone();
        }
        if let Some(v) = update.order_size {
            self.order_size = v;
        }
        if let Some(v) = update.min_order_size {
            self.min_order_size = v;
        }
        if let Some(v) = update.max_order_size {
            self.max_order_size = v;
        }
        if let Some(v) = update.price_tick_size {
            self.price_tick_size = v;
        }
        if let Some(v) = update.size_tick_size {
            self.size_tick_size = v;
        }
        if let Some(v) = update.maker_fee_rate {
            self.maker_fee_rate = v;
        }
        if let Some(v) = update.history_capacity {
            self.history_capacity = v;
        }
        if let Some(v) = update.history_retain {
            self.history_retain = v;
        }
        if let Some(v) = update.pool_fee {
            self.pool_fee = v;
        }
        self.spread.apply(&update.spread);
        self.inventory.apply(&update.inventory);
    }
}

/// Partial override of [`MarketMakerConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMakerConfigUpdate {
    pub symbol: Option<String>,
    pub order_size: Option<Decimal>,
    pub min_order_size: Option<Decimal>,
    pub max_order_size: Option<Decimal>,
    pub price_tick_size: Option<Decimal>,
    pub size_tick_size: Option<Decimal>,
    pub maker_fee_rate: Option<Decimal>,
    pub history_capacity: Option<usize>,
    pub history_retain: Option<usize>,
    pub pool_fee: Option<Decimal>,
    pub spread: SpreadConfigUpdate,
    pub inventory: InventoryConfigUpdate,
}

fn invalid(reason: impl Into<String>) -> MarketMakerError {
    MarketMakerError::InvalidConfig(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MarketMakerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_order_bounds() {
        let config = MarketMakerConfig {
            min_order_size: dec!(10),
            max_order_size: dec!(1),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MarketMakerError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_retain_above_capacity() {
        let config = MarketMakerConfig {
            history_capacity: 10,
            history_retain: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nested_errors_are_reported_as_config_errors() {
        let mut config = MarketMakerConfig::default();
        config.inventory.min_inventory = dec!(5);
        config.inventory.max_inventory = dec!(5);

        match config.validate() {
            Err(MarketMakerError::InvalidConfig(reason)) => assert!(reason.starts_with("inventory")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_update_from_json() {
        let update: MarketMakerConfigUpdate = serde_json::from_str(
            r#"{
                "order_size": "2.5",
                "spread": { "base_spread": "0.003" },
                "inventory": { "max_inventory": "50" }
            }"#,
        )
        .unwrap();

        let mut config = MarketMakerConfig::default();
        config.apply(&update);

        assert_eq!(config.order_size, dec!(2.5));
        assert_eq!(config.spread.base_spread, dec!(0.003));
        assert_eq!(config.inventory.max_inventory, dec!(50));
        assert_eq!(config.symbol, "BTC-USD");
        assert_eq!(config.spread.max_spread, dec!(0.02));
        assert!(config.validate().is_ok());
    }
}
