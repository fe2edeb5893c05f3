//! Spread Model
//!
//! Quote width from market conditions, split asymmetrically by inventory:
//! - Thin markets widen the quote, deep markets tighten it
//! - Volatility above 1% widens linearly
//! - Long inventory widens the bid and tightens the ask (encourage selling)
//! - Short inventory does the opposite

use kestrel_core::{InventoryState, MarketSnapshot, Price, Quantity, Quote, Side};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{SpreadConfig, SpreadConfigUpdate};
use crate::error::Result;

/// Volume at which the volume factor is exactly 1
const REFERENCE_VOLUME: Decimal = dec!(1_000_000);
const MIN_VOLUME_FACTOR: Decimal = dec!(0.5);
const MAX_VOLUME_FACTOR: Decimal = dec!(2);
/// Volatility below this level does not widen the spread
const VOLATILITY_DEAD_ZONE: Decimal = dec!(0.01);

const MIN_SIZE_FACTOR: Decimal = dec!(0.2);
const MAX_SIZE_FACTOR: Decimal = dec!(1.5);
/// Size reduction per unit of ratio on the side that grows the imbalance
const SIZE_SHRINK_RATE: Decimal = dec!(0.8);
/// Size increase per unit of ratio on the side that reduces the imbalance
const SIZE_GROW_RATE: Decimal = dec!(0.4);

/// Result of the spread calculation, as fractions of mid price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadQuote {
    pub bid_spread: Decimal,
    pub ask_spread: Decimal,
    /// Clamped total before the skew split
    pub total_spread: Decimal,
    /// Signed inventory skew applied to the split
    pub skew: Decimal,
}

/// Stateless apart from its configuration
#[derive(Debug, Clone)]
pub struct SpreadModel {
    config: SpreadConfig,
}

impl SpreadModel {
    pub fn new(config: SpreadConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Apply a partial config update. On validation failure the previous
    /// config stays in force.
    pub fn update_config(&mut self, update: &SpreadConfigUpdate) -> Result<()> {
        let mut next = self.config.clone();
        next.apply(update);
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// 1_000_000 / (volume + 1), clamped to [0.5, 2]. The +1 guards volume = 0.
    pub fn volume_factor(volume_24h: Decimal) -> Decimal {
        let volume = volume_24h.max(Decimal::ZERO);
        (REFERENCE_VOLUME / (volume + Decimal::ONE)).clamp(MIN_VOLUME_FACTOR, MAX_VOLUME_FACTOR)
    }

    /// Linear widening above the 1% dead zone
    pub fn volatility_adjustment(&self, volatility: Decimal) -> Decimal {
        (volatility - VOLATILITY_DEAD_ZONE).max(Decimal::ZERO) * self.config.volatility_multiplier
    }

    /// Signed skew in roughly [-multiplier, +multiplier]; zero at ratio 0.5
    pub fn inventory_skew(&self, inventory_ratio: Decimal) -> Decimal {
        (inventory_ratio - dec!(0.5)) * self.config.inventory_skew_multiplier * Decimal::TWO
    }

    /// Calculate bid and ask spreads for the current market and inventory
    pub fn calculate_optimal_spread(
        &self,
        market: &MarketSnapshot,
        inventory: &InventoryState,
    ) -> SpreadQuote {
        let base = self.config.base_spread * Self::volume_factor(market.volume_24h);
        let volatility_adj = self.volatility_adjustment(market.volatility);
        let total_spread =
            (base + volatility_adj).clamp(self.config.min_spread, self.config.max_spread);

        let skew = self.inventory_skew(inventory.inventory_ratio);
        let half_spread = total_spread / Decimal::TWO;
        let floor = self.config.min_spread / Decimal::TWO;

        // Positive skew (long) → wider bid, tighter ask
        let bid_spread = (half_spread * (Decimal::ONE + skew)).max(floor);
        let ask_spread = (half_spread * (Decimal::ONE - skew)).max(floor);

        SpreadQuote {
            bid_spread,
            ask_spread,
            total_spread,
            skew,
        }
    }

    /// Scale a base order size by inventory position.
    ///
    /// The side that would grow the imbalance shrinks; the side that would
    /// reduce it grows. Factor is clamped to [0.2, 1.5].
    pub fn adjust_order_size(
        base_size: Quantity,
        side: Side,
        inventory_ratio: Decimal,
    ) -> Quantity {
        let half = dec!(0.5);
        // Distance toward the side's "bad" direction: long for bids, short for asks
        let excess = match side {
            Side::Buy => inventory_ratio - half,
            Side::Sell => half - inventory_ratio,
        };
        let factor = if excess > Decimal::ZERO {
            Decimal::ONE - excess * SIZE_SHRINK_RATE
        } else {
            Decimal::ONE + (-excess) * SIZE_GROW_RATE
        };
        base_size * factor.clamp(MIN_SIZE_FACTOR, MAX_SIZE_FACTOR)
    }

    /// Build a two-sided quote around `mid_price`
    pub fn generate_quote(
        &self,
        mid_price: Price,
        market: &MarketSnapshot,
        inventory: &InventoryState,
        order_size: Quantity,
    ) -> Quote {
        let spreads = self.calculate_optimal_spread(market, inventory);

        let bid_price = self.round_price(mid_price * (Decimal::ONE - spreads.bid_spread), true);
        let ask_price = self.round_price(mid_price * (Decimal::ONE + spreads.ask_spread), false);

        let bid_size = Self::adjust_order_size(order_size, Side::Buy, inventory.inventory_ratio);
        let ask_size = Self::adjust_order_size(order_size, Side::Sell, inventory.inventory_ratio);

        debug!(
            "[{}] spread total={} bid={} ask={} skew={} ratio={}",
            market.symbol,
            spreads.total_spread,
            spreads.bid_spread,
            spreads.ask_spread,
            spreads.skew,
            inventory.inventory_ratio
        );

        Quote::new(bid_price, bid_size, ask_price, ask_size, mid_price)
    }

    /// Round price to tick size: down for bids, up for asks
    fn round_price(&self, price: Price, is_bid: bool) -> Price {
        let ticks = price / self.config.tick_size;
        let rounded = if is_bid {
            ticks.floor() // Round down for bids
        } else {
            ticks.ceil() // Round up for asks
        };
        rounded * self.config.tick_size
    }
}

impl Default for SpreadModel {
    fn default() -> Self {
        Self {
            config: SpreadConfig::default(),
        }
    }
}
