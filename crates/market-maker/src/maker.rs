//! Market-making coordinator
//!
//! Sequences quote generation, order placement, fill processing, the ledger
//! update, P&L accounting and the rebalance check. Owns one spread model, one
//! inventory ledger and one liquidity pool; they only ever see values passed
//! in from here.

use std::collections::HashMap;
use std::sync::Arc;

use kestrel_core::{
    InventoryState, MarketSnapshot, Order, OrderId, Price, Quantity, Quote, Side, Timestamp, Trade,
};
use kestrel_inventory::{ClampEvent, InventoryLedger, InventoryUpdate};
use kestrel_pool::{
    AddLiquidityResult, LiquidityPool, LiquidityPosition, PoolError, PoolState,
    RemoveLiquidityResult, SwapResult, Token,
};
use kestrel_ports::{Clock, IdGenerator};
use kestrel_spread::SpreadModel;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::config::{MarketMakerConfig, MarketMakerConfigUpdate};
use crate::error::{MarketMakerError, Result};
use crate::history::TradeHistory;
use crate::stats::{MarketMakerStats, TradeStats};

/// Everything a fill changed
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub trade: Trade,
    /// Order state after the fill
    pub order: Order,
    /// P&L realized by this fill; zero unless it reduced the position
    pub realized_pnl: Decimal,
    pub inventory: InventoryUpdate,
    pub needs_rebalancing: bool,
}

pub struct MarketMaker {
    config: MarketMakerConfig,
    spread_model: SpreadModel,
    ledger: InventoryLedger,
    pool: LiquidityPool,
    open_orders: HashMap<OrderId, Order>,
    history: TradeHistory,
    /// Last snapshot quoted against; used to mark the position
    last_market: Option<MarketSnapshot>,
    realized_pnl: Decimal,
    total_volume: Decimal,
    total_notional: Decimal,
    total_fees: Decimal,
    trade_count: u64,
    started_at: Timestamp,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl MarketMaker {
    pub fn new(
        config: MarketMakerConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        config.validate()?;

        let spread_model = SpreadModel::new(config.spread.clone())?;
        let ledger = InventoryLedger::new(config.inventory.clone())?;
        let pool = LiquidityPool::new(config.pool_fee, clock.clone())?;
        let history = TradeHistory::new(config.history_capacity, config.history_retain);

        info!(
            "[{}] Market maker started (order size {}, clock {})",
            config.symbol,
            config.order_size,
            clock.name()
        );

        Ok(Self {
            started_at: clock.now(),
            config,
            spread_model,
            ledger,
            pool,
            open_orders: HashMap::new(),
            history,
            last_market: None,
            realized_pnl: Decimal::ZERO,
            total_volume: Decimal::ZERO,
            total_notional: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            trade_count: 0,
            clock,
            ids,
        })
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn spread_model(&self) -> &SpreadModel {
        &self.spread_model
    }

    pub fn inventory_state(&self) -> InventoryState {
        self.ledger.get_state()
    }

    pub fn trade_history(&self) -> &TradeHistory {
        &self.history
    }

    pub fn open_order(&self, order_id: &str) -> Option<&Order> {
        self.open_orders.get(order_id)
    }

    /// Open orders, oldest first
    pub fn open_orders(&self) -> Vec<&Order> {
        let mut orders: Vec<_> = self.open_orders.values().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        orders
    }

    // ========================================================================
    // Quoting
    // ========================================================================

    /// Quote around the snapshot's mid using the current inventory
    pub fn generate_quotes(&mut self, market: &MarketSnapshot) -> Quote {
        let mid = market.mid_price();
        let inventory = self.ledger.get_state();
        let quote = self
            .spread_model
            .generate_quote(mid, market, &inventory, self.config.order_size);
        self.last_market = Some(market.clone());
        quote
    }

    /// Turn a quote into a resting bid and ask.
    ///
    /// Both orders are returned; one that could not be sized comes back
    /// `Rejected` and is not in the open table.
    pub fn place_orders(&mut self, quote: &Quote) -> Vec<Order> {
        vec![
            self.create_order(Side::Buy, quote.bid_price, quote.bid_size),
            self.create_order(Side::Sell, quote.ask_price, quote.ask_size),
        ]
    }

    /// Cancel everything, then quote and place fresh orders
    pub fn requote(&mut self, market: &MarketSnapshot) -> Vec<Order> {
        let cancelled = self.cancel_all_orders();
        let quote = self.generate_quotes(market);
        debug!(
            "[{}] Requote: cancelled {}, bid {} x {} / ask {} x {}",
            self.config.symbol,
            cancelled.len(),
            quote.bid_price,
            quote.bid_size,
            quote.ask_price,
            quote.ask_size
        );
        self.place_orders(&quote)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Create and record an order.
    ///
    /// Size is clamped to the configured bounds, then shrunk to what the
    /// ledger can absorb on that side. Price and size are tick-rounded. An
    /// order left with nothing to trade is returned `Rejected`.
    pub fn create_order(&mut self, side: Side, price: Price, size: Quantity) -> Order {
        let mut size = size.clamp(self.config.min_order_size, self.config.max_order_size);

        if !self.ledger.should_accept_order(side, size) {
            let capacity = self.ledger.get_max_order_size(side);
            debug!(
                "[{}] {:?} order resized from {} to ledger capacity {}",
                self.config.symbol, side, size, capacity
            );
            size = capacity;
        }

        let size = round_down(size, self.config.size_tick_size);
        let price = round_price(price, self.config.price_tick_size, side);

        let timestamp = self.clock.now();
        let mut order = Order::new(
            self.ids.next_id(),
            self.config.symbol.clone(),
            side,
            price,
            size,
            timestamp,
        );

        if size <= Decimal::ZERO || price <= Decimal::ZERO {
            order.reject(timestamp);
            warn!(
                "[{}] {:?} order {} rejected: size={} price={}",
                self.config.symbol, side, order.id, size, price
            );
            return order;
        }

        debug!(
            "[{}] Placed {:?} {} @ {} ({})",
            self.config.symbol, side, size, price, order.id
        );
        self.open_orders.insert(order.id.clone(), order.clone());
        order
    }

    /// Apply a fill to an open order.
    ///
    /// The fill is capped at the order's remaining size and priced at
    /// `fill_price`, or the order's own price when `None`. The resulting
    /// trade goes to the ledger, the P&L accumulators and the history.
    pub fn process_fill(
        &mut self,
        order_id: &str,
        fill_size: Quantity,
        fill_price: Option<Price>,
    ) -> Result<FillOutcome> {
        if fill_size <= Decimal::ZERO {
            return Err(MarketMakerError::InvalidFill(format!(
                "fill size must be positive, got {}",
                fill_size
            )));
        }

        let timestamp = self.clock.now();
        let order = self
            .open_orders
            .get_mut(order_id)
            .ok_or_else(|| MarketMakerError::OrderNotFound(order_id.to_string()))?;

        if !order.status.is_active() {
            return Err(MarketMakerError::OrderNotActive {
                id: order.id.clone(),
                status: order.status,
            });
        }

        let price = fill_price.unwrap_or(order.price);
        if price <= Decimal::ZERO {
            return Err(MarketMakerError::InvalidFill(format!(
                "fill price must be positive, got {}",
                price
            )));
        }

        let applied = order.apply_fill(fill_size, timestamp);
        let order = order.clone();
        if order.is_filled() {
            self.open_orders.remove(order_id);
        }

        let fee = price * applied * self.config.maker_fee_rate;
        let trade = Trade::new(
            self.ids.next_id(),
            self.config.symbol.clone(),
            order.side,
            price,
            applied,
            timestamp,
        )
        .with_order_id(order.id.clone())
        .with_fee(fee);

        let realized_pnl = realized_pnl(
            self.ledger.current_inventory(),
            self.ledger.avg_entry_price(),
            &trade,
        );
        let inventory = self.ledger.update_inventory(&trade);

        self.realized_pnl += realized_pnl;
        self.total_volume += trade.size;
        self.total_notional += trade.notional();
        self.total_fees += trade.fee;
        self.trade_count += 1;

        let evicted = self.history.push(trade.clone());
        if evicted > 0 {
            debug!(
                "[{}] Trade history trimmed by {} entries",
                self.config.symbol, evicted
            );
        }

        let needs_rebalancing = self.ledger.needs_rebalancing();
        info!(
            "[{}] Fill {:?} {} @ {} on {} ({:?}), inventory {} -> {}, realized {}",
            self.config.symbol,
            trade.side,
            trade.size,
            trade.price,
            order.id,
            order.status,
            inventory.previous,
            inventory.current,
            realized_pnl
        );

        Ok(FillOutcome {
            trade,
            order,
            realized_pnl,
            inventory,
            needs_rebalancing,
        })
    }

    /// Cancel one open order and drop it from the table
    pub fn cancel_order(&mut self, order_id: &str) -> Result<Order> {
        let mut order = self
            .open_orders
            .remove(order_id)
            .ok_or_else(|| MarketMakerError::OrderNotFound(order_id.to_string()))?;

        order.cancel(self.clock.now());
        debug!("[{}] Cancelled {}", self.config.symbol, order.id);
        Ok(order)
    }

    /// Cancel every open order. Returned oldest first.
    pub fn cancel_all_orders(&mut self) -> Vec<Order> {
        let timestamp = self.clock.now();
        let mut cancelled: Vec<Order> = self
            .open_orders
            .drain()
            .map(|(_, mut order)| {
                order.cancel(timestamp);
                order
            })
            .collect();
        cancelled.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        if !cancelled.is_empty() {
            debug!(
                "[{}] Cancelled {} open orders",
                self.config.symbol,
                cancelled.len()
            );
        }
        cancelled
    }

    /// Issue a corrective order when inventory has drifted past the threshold.
    ///
    /// The order crosses the touch: buys at the ask, sells at the bid.
    pub fn execute_rebalance(&mut self, market: &MarketSnapshot) -> Option<Order> {
        if !self.ledger.needs_rebalancing() {
            return None;
        }

        let amount = self.ledger.get_rebalance_amount();
        if amount.is_zero() {
            return None;
        }

        let (side, touch) = if amount > Decimal::ZERO {
            (Side::Buy, market.ask_price)
        } else {
            (Side::Sell, market.bid_price)
        };
        let price = if touch > Decimal::ZERO {
            touch
        } else {
            market.mid_price()
        };

        info!(
            "[{}] Rebalancing: inventory {} vs target {}, {:?} {} @ {}",
            self.config.symbol,
            self.ledger.current_inventory(),
            self.ledger.config().target_inventory,
            side,
            amount.abs(),
            price
        );
        Some(self.create_order(side, price, amount.abs()))
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub fn get_stats(&self) -> MarketMakerStats {
        let unrealized_pnl = self
            .last_market
            .as_ref()
            .map(|market| {
                self.ledger
                    .calculate_position(market.mid_price())
                    .unrealized_pnl
            })
            .unwrap_or(Decimal::ZERO);

        MarketMakerStats {
            symbol: self.config.symbol.clone(),
            open_orders: self.open_orders.len(),
            trade_count: self.trade_count,
            history_len: self.history.len(),
            total_volume: self.total_volume,
            total_notional: self.total_notional,
            realized_pnl: self.realized_pnl,
            unrealized_pnl,
            total_fees: self.total_fees,
            net_pnl: self.realized_pnl + unrealized_pnl - self.total_fees,
            inventory: self.ledger.get_state(),
            avg_entry_price: self.ledger.avg_entry_price(),
            uptime: self.clock.now() - self.started_at,
        }
    }

    /// Aggregates over the retained history window
    pub fn get_trade_stats(&self) -> TradeStats {
        TradeStats::from_trades(self.history.iter())
    }

    // ========================================================================
    // Liquidity pool
    // ========================================================================
    //
    // None of these touch inventory, orders or P&L.

    pub fn pool(&self) -> &LiquidityPool {
        &self.pool
    }

    pub fn initialize_pool(&mut self, amount_a: Decimal, amount_b: Decimal) -> Result<Decimal> {
        Ok(self.pool.initialize(amount_a, amount_b)?)
    }

    pub fn simulate_swap(&self, amount_in: Decimal, token_in: Token) -> Result<SwapResult> {
        Ok(self.pool.simulate_swap(amount_in, token_in)?)
    }

    pub fn execute_swap(
        &mut self,
        amount_in: Decimal,
        token_in: Token,
        min_amount_out: Decimal,
    ) -> Result<SwapResult> {
        self.pool
            .execute_swap(amount_in, token_in, min_amount_out)
            .map_err(|err| {
                if let PoolError::SlippageExceeded { expected, actual } = &err {
                    warn!(
                        "[{}] Pool swap rejected: wanted at least {}, would get {}",
                        self.config.symbol, expected, actual
                    );
                }
                err.into()
            })
    }

    pub fn add_liquidity(
        &mut self,
        amount_a: Decimal,
        amount_b: Decimal,
    ) -> Result<AddLiquidityResult> {
        Ok(self.pool.add_liquidity(amount_a, amount_b)?)
    }

    pub fn remove_liquidity(&mut self, lp_tokens: Decimal) -> Result<RemoveLiquidityResult> {
        Ok(self.pool.remove_liquidity(lp_tokens)?)
    }

    pub fn pool_price(&self) -> Decimal {
        self.pool.get_price()
    }

    pub fn pool_state(&self) -> PoolState {
        self.pool.state()
    }

    pub fn pool_amount_in(&self, amount_out: Decimal, token_out: Token) -> Result<Decimal> {
        Ok(self.pool.get_amount_in(amount_out, token_out)?)
    }

    pub fn liquidity_position(&self, lp_tokens: Decimal) -> Result<LiquidityPosition> {
        Ok(self.pool.get_liquidity_position(lp_tokens)?)
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Apply a partial update to this and the owned engines.
    ///
    /// The merged config is validated first; on failure nothing changes.
    /// Returns the clamp event if the position fell outside new inventory limits.
    pub fn update_config(&mut self, update: &MarketMakerConfigUpdate) -> Result<Option<ClampEvent>> {
        let mut next = self.config.clone();
        next.apply(update);
        next.validate()?;

        // The ledger can still refuse a band its position cannot be re-clamped
        // into, so it goes first
        let clamp = self.ledger.update_config(&update.inventory)?;
        self.spread_model.update_config(&update.spread)?;
        self.pool.set_fee(next.pool_fee)?;
        self.history
            .set_limits(next.history_capacity, next.history_retain);

        info!("[{}] Configuration updated", next.symbol);
        self.config = next;
        Ok(clamp)
    }
}

impl std::fmt::Debug for MarketMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketMaker")
            .field("symbol", &self.config.symbol)
            .field("open_orders", &self.open_orders.len())
            .field("inventory", &self.ledger.current_inventory())
            .field("realized_pnl", &self.realized_pnl)
            .field("pool", &self.pool)
            .finish()
    }
}

/// P&L closed out by `trade` against a position of `position` at `avg_entry`
fn realized_pnl(position: Decimal, avg_entry: Decimal, trade: &Trade) -> Decimal {
    let signed = trade.signed_size();
    let reducing = (position > Decimal::ZERO && signed < Decimal::ZERO)
        || (position < Decimal::ZERO && signed > Decimal::ZERO);
    if !reducing {
        return Decimal::ZERO;
    }

    let closed = trade.size.min(position.abs());
    if position > Decimal::ZERO {
        closed * (trade.price - avg_entry)
    } else {
        closed * (avg_entry - trade.price)
    }
}

/// Round to tick: buys down, sells up
fn round_price(price: Price, tick: Decimal, side: Side) -> Price {
    let ticks = price / tick;
    let rounded = match side {
        Side::Buy => ticks.floor(),
        Side::Sell => ticks.ceil(),
    };
    rounded * tick
}

fn round_down(size: Quantity, tick: Decimal) -> Quantity {
    (size / tick).floor() * tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kestrel_clock::ManualClock;
    use kestrel_core::OrderStatus;
    use kestrel_ids::SequentialIdGenerator;
    use rust_decimal_macros::dec;

    fn maker(config: MarketMakerConfig) -> MarketMaker {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        ));
        let ids = Arc::new(SequentialIdGenerator::new("mm"));
        MarketMaker::new(config, clock, ids).unwrap()
    }

    fn trade(side: Side, price: Decimal, size: Decimal) -> Trade {
        Trade::new("t", "BTC-USD", side, price, size, Utc::now())
    }

    #[test]
    fn test_round_price_by_side() {
        assert_eq!(round_price(dec!(100.567), dec!(0.01), Side::Buy), dec!(100.56));
        assert_eq!(round_price(dec!(100.561), dec!(0.01), Side::Sell), dec!(100.57));
        assert_eq!(round_price(dec!(100.50), dec!(0.01), Side::Sell), dec!(100.50));
        assert_eq!(round_down(dec!(1.23456), dec!(0.0001)), dec!(1.2345));
    }

    #[test]
    fn test_realized_pnl_only_on_reduction() {
        // Opening or extending realizes nothing
        assert_eq!(
            realized_pnl(Decimal::ZERO, Decimal::ZERO, &trade(Side::Buy, dec!(100), dec!(5))),
            Decimal::ZERO
        );
        assert_eq!(
            realized_pnl(dec!(5), dec!(100), &trade(Side::Buy, dec!(110), dec!(5))),
            Decimal::ZERO
        );

        // Closing a long
        assert_eq!(
            realized_pnl(dec!(5), dec!(100), &trade(Side::Sell, dec!(110), dec!(2))),
            dec!(20)
        );
        // Closing a short at a loss
        assert_eq!(
            realized_pnl(dec!(-4), dec!(100), &trade(Side::Buy, dec!(105), dec!(4))),
            dec!(-20)
        );
        // Flip: only the closed part counts
        assert_eq!(
            realized_pnl(dec!(3), dec!(100), &trade(Side::Sell, dec!(90), dec!(10))),
            dec!(-30)
        );
    }

    #[test]
    fn test_create_order_clamps_to_bounds() {
        let mut mm = maker(MarketMakerConfig::default());

        let big = mm.create_order(Side::Buy, dec!(100), dec!(500));
        assert_eq!(big.size, dec!(100));

        let tiny = mm.create_order(Side::Sell, dec!(100), dec!(0.0001));
        assert_eq!(tiny.size, dec!(0.01));
        assert_eq!(mm.open_orders().len(), 2);
    }

    #[test]
    fn test_create_order_shrinks_to_ledger_capacity() {
        let mut config = MarketMakerConfig::default();
        config.inventory.max_inventory = dec!(2.5);
        config.inventory.min_inventory = dec!(-2.5);
        let mut mm = maker(config);

        let order = mm.create_order(Side::Buy, dec!(100), dec!(10));
        assert_eq!(order.size, dec!(2.5));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = MarketMakerConfig::default();
        config.inventory.max_inventory = dec!(1);
        config.inventory.min_inventory = dec!(-1);
        let mut mm = maker(config);

        let order = mm.create_order(Side::Buy, dec!(100), dec!(1));
        mm.process_fill(&order.id, dec!(1), None).unwrap();

        let rejected = mm.create_order(Side::Buy, dec!(100), dec!(1));
        assert_eq!(rejected.status, OrderStatus::Rejected);
        assert!(mm.open_order(&rejected.id).is_none());
    }

    #[test]
    fn test_fill_errors() {
        let mut mm = maker(MarketMakerConfig::default());
        let order = mm.create_order(Side::Buy, dec!(100), dec!(1));

        assert!(matches!(
            mm.process_fill(&order.id, Decimal::ZERO, None),
            Err(MarketMakerError::InvalidFill(_))
        ));
        assert!(matches!(
            mm.process_fill(&order.id, dec!(1), Some(dec!(-5))),
            Err(MarketMakerError::InvalidFill(_))
        ));
        assert_eq!(
            mm.process_fill("missing", dec!(1), None),
            Err(MarketMakerError::OrderNotFound("missing".to_string()))
        );

        // Rejected fills change nothing
        assert_eq!(mm.get_stats().trade_count, 0);
        assert_eq!(mm.open_order(&order.id).map(|o| o.filled_size), Some(Decimal::ZERO));
    }

    #[test]
    fn test_fee_charged_on_notional() {
        let mut mm = maker(MarketMakerConfig {
            maker_fee_rate: dec!(0.001),
            ..Default::default()
        });
        let order = mm.create_order(Side::Sell, dec!(200), dec!(2));

        let outcome = mm.process_fill(&order.id, dec!(2), None).unwrap();
        assert_eq!(outcome.trade.fee, dec!(0.4));
        assert_eq!(mm.get_stats().total_fees, dec!(0.4));
    }
}
