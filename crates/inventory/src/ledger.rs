//! Inventory Ledger
//!
//! Owns the running position and average entry price. A trade moves the
//! position by its signed size, then the result is clamped into the
//! configured band. Clamping is reported through [`InventoryUpdate`].

use kestrel_core::{InventoryState, Price, Quantity, Side, Trade};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal::prelude::Signed;
use serde::{Deserialize, Serialize};

use crate::config::{InventoryConfig, InventoryConfigUpdate};
use crate::error::{ConfigError, Result};

/// A position overshoot that was capped at a limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampEvent {
    /// Position the trade would have produced
    pub requested: Decimal,
    /// Limit the position was capped at
    pub limit: Decimal,
    /// |requested - limit|
    pub overshoot: Decimal,
}

/// Outcome of applying a trade to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub previous: Decimal,
    pub current: Decimal,
    /// Present when the trade pushed the position past a limit
    pub clamp: Option<ClampEvent>,
}

impl InventoryUpdate {
    pub fn was_clamped(&self) -> bool {
        self.clamp.is_some()
    }
}

/// Mark-to-market view of the position at a given price. Derived, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Base asset held (= current inventory)
    pub base_balance: Decimal,
    /// Quote asset offsetting the base position at the mark (-base * price)
    pub quote_balance: Decimal,
    /// Signed notional of the base position at the mark
    pub net_exposure: Decimal,
    /// base * (price - avg_entry_price)
    pub unrealized_pnl: Decimal,
}

/// Position and cost-basis tracker with hard limits
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    config: InventoryConfig,
    current_inventory: Decimal,
    avg_entry_price: Decimal,
    trade_count: u64,
}

impl InventoryLedger {
    pub fn new(config: InventoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current_inventory: Decimal::ZERO,
            avg_entry_price: Decimal::ZERO,
            trade_count: 0,
        })
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn current_inventory(&self) -> Decimal {
        self.current_inventory
    }

    pub fn avg_entry_price(&self) -> Price {
        self.avg_entry_price
    }

    /// Number of trades applied since creation or the last reset
    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }

    /// Apply a trade: move the position, clamp it, update the cost basis
    pub fn update_inventory(&mut self, trade: &Trade) -> InventoryUpdate {
        let previous = self.current_inventory;
        let requested = previous + trade.signed_size();
        let (current, clamp) = self.clamp_to_limits(requested);

        self.avg_entry_price =
            next_entry_price(previous, current, self.avg_entry_price, trade.price);
        self.current_inventory = current;
        self.trade_count += 1;

        if let Some(event) = clamp {
            warn!(
                "Inventory limit hit on trade {}: requested={} capped at {} (overshoot {})",
                trade.id, event.requested, event.limit, event.overshoot
            );
        } else {
            debug!(
                "Inventory {} -> {} after {:?} {} @ {}, avg entry {}",
                previous, current, trade.side, trade.size, trade.price, self.avg_entry_price
            );
        }

        InventoryUpdate {
            previous,
            current,
            clamp,
        }
    }

    /// Snapshot for the spread model
    pub fn get_state(&self) -> InventoryState {
        InventoryState::new(
            self.current_inventory,
            self.config.target_inventory,
            self.config.min_inventory,
            self.config.max_inventory,
            self.config.skew_sensitivity,
        )
    }

    /// Mark the position to `price`
    pub fn calculate_position(&self, price: Price) -> Position {
        let base = self.current_inventory;
        let unrealized_pnl = if base.is_zero() {
            Decimal::ZERO
        } else {
            base * (price - self.avg_entry_price)
        };

        Position {
            base_balance: base,
            quote_balance: -base * price,
            net_exposure: base * price,
            unrealized_pnl,
        }
    }

    /// Would an order of `size` on `side` keep the position within limits if fully filled?
    pub fn should_accept_order(&self, side: Side, size: Quantity) -> bool {
        let resulting = self.current_inventory + side.sign() * size;
        resulting >= self.config.min_inventory && resulting <= self.config.max_inventory
    }

    /// Largest size on `side` that keeps the position within limits
    pub fn get_max_order_size(&self, side: Side) -> Quantity {
        let headroom = match side {
            Side::Buy => self.config.max_inventory - self.current_inventory,
            Side::Sell => self.current_inventory - self.config.min_inventory,
        };
        headroom.max(Decimal::ZERO)
    }

    /// Deviation from target as a fraction of the allowed range
    pub fn deviation_ratio(&self) -> Decimal {
        let range = self.config.range();
        if range <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.current_inventory - self.config.target_inventory).abs() / range
    }

    pub fn needs_rebalancing(&self) -> bool {
        self.deviation_ratio() > self.config.rebalance_threshold
    }

    /// Signed size that returns the position to target: positive = buy, negative = sell
    pub fn get_rebalance_amount(&self) -> Quantity {
        self.config.target_inventory - self.current_inventory
    }

    /// Flatten the ledger
    pub fn reset(&mut self) {
        self.current_inventory = Decimal::ZERO;
        self.avg_entry_price = Decimal::ZERO;
        self.trade_count = 0;
    }

    /// Apply a partial config update, re-clamping the position into the new band.
    ///
    /// A band that would flip the position to the other side, or open one from
    /// flat, is rejected: no trade price exists to carry the entry price over.
    /// On any error the previous config stays in force.
    pub fn update_config(&mut self, update: &InventoryConfigUpdate) -> Result<Option<ClampEvent>> {
        let mut next = self.config.clone();
        next.apply(update);
        next.validate()?;

        let reclamped = self
            .current_inventory
            .clamp(next.min_inventory, next.max_inventory);
        if !reclamped.is_zero() && reclamped.signum() != self.current_inventory.signum() {
            return Err(ConfigError::PositionOutsideLimits {
                current: self.current_inventory,
                min: next.min_inventory,
                max: next.max_inventory,
            });
        }
        self.config = next;

        let (current, clamp) = self.clamp_to_limits(self.current_inventory);
        if let Some(event) = clamp {
            warn!(
                "Inventory {} outside new limits, capped at {}",
                event.requested, event.limit
            );
            if current.is_zero() {
                self.avg_entry_price = Decimal::ZERO;
            }
        }
        self.current_inventory = current;
        Ok(clamp)
    }

    fn clamp_to_limits(&self, requested: Decimal) -> (Decimal, Option<ClampEvent>) {
        let current = requested.clamp(self.config.min_inventory, self.config.max_inventory);
        let clamp = (current != requested).then(|| ClampEvent {
            requested,
            limit: current,
            overshoot: (requested - current).abs(),
        });
        (current, clamp)
    }
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self {
            config: InventoryConfig::default(),
            current_inventory: Decimal::ZERO,
            avg_entry_price: Decimal::ZERO,
            trade_count: 0,
        }
    }
}

/// Average entry price after moving from `previous` to `current` at `price`.
///
/// - flat → zero
/// - adding to the same side → weighted average over the absorbed size
/// - crossing zero → the crossing trade's price
/// - reducing without crossing → unchanged
fn next_entry_price(previous: Decimal, current: Decimal, avg: Price, price: Price) -> Price {
    if current.is_zero() {
        return Decimal::ZERO;
    }
    if previous.is_zero() {
        return price;
    }

    let same_side = previous.is_sign_positive() == current.is_sign_positive();
    if !same_side {
        return price;
    }

    if current.abs() > previous.abs() {
        let absorbed = current.abs() - previous.abs();
        (previous.abs() * avg + absorbed * price) / current.abs()
    } else {
        avg
    }
}
