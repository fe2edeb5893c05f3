//! Integration test: market maker coordinator
//!
//! Tests the complete flow:
//! 1. Market snapshot arrives, MM quotes bid/ask
//! 2. Quotes become resting orders
//! 3. Fills update inventory and realized P&L
//! 4. Inventory skews the next quote
//! 5. Drift past the threshold triggers a rebalance order
//! 6. Pool operations run alongside without touching inventory

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use kestrel_clock::{Clock, ManualClock};
use kestrel_core::{MarketSnapshot, OrderStatus, Side};
use kestrel_ids::SequentialIdGenerator;
use kestrel_inventory::InventoryConfigUpdate;
use kestrel_market_maker::{
    MarketMaker, MarketMakerConfig, MarketMakerConfigUpdate, MarketMakerError, PoolError, Token,
};
use kestrel_spread::SpreadConfigUpdate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Helper to build a market maker on a manual clock
fn setup(config: MarketMakerConfig) -> (MarketMaker, Arc<ManualClock>) {
    let _ = env_logger::try_init();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap(),
    ));
    let ids = Arc::new(SequentialIdGenerator::new("mm"));
    let mm = MarketMaker::new(config, clock.clone(), ids).unwrap();
    (mm, clock)
}

/// Config with a tight ±10 inventory band so skew is easy to observe
fn small_book_config() -> MarketMakerConfig {
    let mut config = MarketMakerConfig::default();
    config.inventory.max_inventory = dec!(10);
    config.inventory.min_inventory = dec!(-10);
    config
}

/// 50000 mid, no volume history (widest volume factor), no volatility
fn btc_market() -> MarketSnapshot {
    MarketSnapshot::new("BTC-USD", dec!(49990), dec!(50010))
}

#[test]
fn test_flat_inventory_quotes_symmetrically() {
    let (mut mm, _) = setup(MarketMakerConfig::default());

    let quote = mm.generate_quotes(&btc_market());

    // base 0.002 * volume factor 2 = 0.004 total, 0.002 each side
    assert_eq!(quote.mid_price, dec!(50000));
    assert_eq!(quote.bid_price, dec!(49900));
    assert_eq!(quote.ask_price, dec!(50100));
    assert_eq!(quote.spread, dec!(200));
    assert_eq!(quote.bid_size, dec!(1));
    assert_eq!(quote.ask_size, dec!(1));
}

#[test]
fn test_round_trip_realizes_spread() {
    let (mut mm, _) = setup(MarketMakerConfig::default());

    let orders = mm.requote(&btc_market());
    assert_eq!(orders.len(), 2);
    let (bid, ask) = (&orders[0], &orders[1]);
    assert_eq!(bid.side, Side::Buy);
    assert_eq!(ask.side, Side::Sell);
    assert_eq!(mm.open_orders().len(), 2);

    // Bid lifted: long 1 @ 49900, nothing realized
    let fill = mm.process_fill(&bid.id, dec!(1), None).unwrap();
    assert_eq!(fill.order.status, OrderStatus::Filled);
    assert_eq!(fill.trade.order_id, bid.id);
    assert_eq!(fill.realized_pnl, Decimal::ZERO);
    assert_eq!(fill.inventory.current, dec!(1));
    assert!(mm.open_order(&bid.id).is_none());

    // Ask hit: flat again, spread captured
    let fill = mm.process_fill(&ask.id, dec!(1), None).unwrap();
    assert_eq!(fill.realized_pnl, dec!(200));
    assert_eq!(fill.inventory.current, Decimal::ZERO);

    let stats = mm.get_stats();
    assert_eq!(stats.realized_pnl, dec!(200));
    assert_eq!(stats.unrealized_pnl, Decimal::ZERO);
    assert_eq!(stats.net_pnl, dec!(200));
    assert_eq!(stats.trade_count, 2);
    assert_eq!(stats.total_volume, dec!(2));
    assert_eq!(stats.total_notional, dec!(100000));
    assert_eq!(stats.open_orders, 0);

    let trade_stats = mm.get_trade_stats();
    assert_eq!(trade_stats.avg_buy_price, dec!(49900));
    assert_eq!(trade_stats.avg_sell_price, dec!(50100));
}

#[test]
fn test_partial_fills_are_capped_at_remaining() {
    let (mut mm, _) = setup(MarketMakerConfig::default());
    let order = mm.create_order(Side::Buy, dec!(50000), dec!(1));

    let first = mm.process_fill(&order.id, dec!(0.4), None).unwrap();
    assert_eq!(first.order.status, OrderStatus::Partial);
    assert_eq!(first.order.filled_size, dec!(0.4));
    assert!(mm.open_order(&order.id).is_some());

    // Overfill only takes what is left
    let second = mm.process_fill(&order.id, dec!(5), Some(dec!(49950))).unwrap();
    assert_eq!(second.trade.size, dec!(0.6));
    assert_eq!(second.trade.price, dec!(49950));
    assert_eq!(second.order.status, OrderStatus::Filled);
    assert!(mm.open_order(&order.id).is_none());

    // avg entry = (0.4 * 50000 + 0.6 * 49950) / 1
    assert_eq!(mm.ledger().avg_entry_price(), dec!(49970));
    assert_eq!(
        mm.process_fill(&order.id, dec!(1), None),
        Err(MarketMakerError::OrderNotFound(order.id.clone()))
    );
}

#[test]
fn test_long_inventory_skews_quotes() {
    let (mut mm, _) = setup(small_book_config());
    let market = btc_market();

    let order = mm.create_order(Side::Buy, dec!(49900), dec!(5));
    mm.process_fill(&order.id, dec!(5), None).unwrap();

    // ratio 0.75 -> skew 0.25: bid 0.25%, ask 0.15%
    let quote = mm.generate_quotes(&market);
    assert_eq!(quote.bid_price, dec!(49875));
    assert_eq!(quote.ask_price, dec!(50075));
    assert!(quote.mid_price - quote.bid_price > quote.ask_price - quote.mid_price);

    // Buying side shrinks, selling side grows
    assert_eq!(quote.bid_size, dec!(0.8));
    assert_eq!(quote.ask_size, dec!(1.1));

    // Marked at the 50000 mid
    let stats = mm.get_stats();
    assert_eq!(stats.unrealized_pnl, dec!(500));
    assert!(stats.inventory.is_long());
    assert_eq!(stats.avg_entry_price, dec!(49900));
}

#[test]
fn test_rebalance_crosses_the_touch() {
    let (mut mm, _) = setup(small_book_config());
    let market = btc_market();
    mm.generate_quotes(&market);

    // Within threshold: nothing to do
    let order = mm.create_order(Side::Buy, dec!(50000), dec!(5));
    let fill = mm.process_fill(&order.id, dec!(5), None).unwrap();
    assert!(!fill.needs_rebalancing);
    assert!(mm.execute_rebalance(&market).is_none());

    // 7 / 20 = 0.35 > 0.3
    let order = mm.create_order(Side::Buy, dec!(50000), dec!(2));
    let fill = mm.process_fill(&order.id, dec!(2), None).unwrap();
    assert!(fill.needs_rebalancing);

    let rebalance = mm.execute_rebalance(&market).unwrap();
    assert_eq!(rebalance.side, Side::Sell);
    assert_eq!(rebalance.size, dec!(7));
    assert_eq!(rebalance.price, dec!(49990));
    assert_eq!(rebalance.status, OrderStatus::Pending);

    let fill = mm.process_fill(&rebalance.id, dec!(7), None).unwrap();
    assert_eq!(fill.inventory.current, Decimal::ZERO);
    assert_eq!(fill.realized_pnl, dec!(-70));
    assert!(!fill.needs_rebalancing);
}

#[test]
fn test_order_sizing_respects_inventory_headroom() {
    let (mut mm, _) = setup(small_book_config());

    let order = mm.create_order(Side::Buy, dec!(50000), dec!(8));
    mm.process_fill(&order.id, dec!(8), None).unwrap();

    // Only 2 units of long headroom remain
    let order = mm.create_order(Side::Buy, dec!(50000), dec!(5));
    assert_eq!(order.size, dec!(2));

    // Sell side has 18
    let order = mm.create_order(Side::Sell, dec!(50000), dec!(50));
    assert_eq!(order.size, dec!(18));
}

#[test]
fn test_cancel_orders() {
    let (mut mm, clock) = setup(MarketMakerConfig::default());
    let orders = mm.requote(&btc_market());

    clock.advance(Duration::seconds(1));
    let cancelled = mm.cancel_order(&orders[0].id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.updated_at, clock.now());
    assert!(matches!(
        mm.cancel_order(&orders[0].id),
        Err(MarketMakerError::OrderNotFound(_))
    ));

    // Requote replaces whatever is left
    let replaced = mm.requote(&btc_market());
    assert_eq!(mm.open_orders().len(), 2);
    assert!(mm.open_order(&orders[1].id).is_none());

    let cancelled = mm.cancel_all_orders();
    assert_eq!(cancelled.len(), 2);
    assert_eq!(cancelled[0].id, replaced[0].id);
    assert!(cancelled.iter().all(|o| o.status == OrderStatus::Cancelled));
    assert!(mm.open_orders().is_empty());
}

#[test]
fn test_history_window_does_not_reset_lifetime_counters() {
    let (mut mm, _) = setup(MarketMakerConfig {
        history_capacity: 10,
        history_retain: 5,
        ..Default::default()
    });

    for _ in 0..11 {
        let order = mm.create_order(Side::Buy, dec!(100), dec!(0.1));
        mm.process_fill(&order.id, dec!(0.1), None).unwrap();
    }

    let stats = mm.get_stats();
    assert_eq!(stats.trade_count, 11);
    assert_eq!(stats.history_len, 5);
    assert_eq!(stats.total_volume, dec!(1.1));
    assert_eq!(mm.get_trade_stats().trade_count, 5);
    assert_eq!(mm.get_trade_stats().buy_volume, dec!(0.5));
}

#[test]
fn test_config_update_reclamps_inventory() {
    let (mut mm, _) = setup(small_book_config());
    let order = mm.create_order(Side::Buy, dec!(50000), dec!(7));
    mm.process_fill(&order.id, dec!(7), None).unwrap();

    let update = MarketMakerConfigUpdate {
        order_size: Some(dec!(2)),
        inventory: InventoryConfigUpdate {
            max_inventory: Some(dec!(5)),
            min_inventory: Some(dec!(-5)),
            ..Default::default()
        },
        ..Default::default()
    };
    let clamp = mm.update_config(&update).unwrap().unwrap();
    assert_eq!(clamp.requested, dec!(7));
    assert_eq!(clamp.limit, dec!(5));
    assert_eq!(mm.ledger().current_inventory(), dec!(5));
    assert_eq!(mm.config().order_size, dec!(2));
}

#[test]
fn test_invalid_config_update_keeps_previous() {
    let (mut mm, _) = setup(MarketMakerConfig::default());
    let before = mm.config().clone();

    let update = MarketMakerConfigUpdate {
        order_size: Some(dec!(3)),
        min_order_size: Some(dec!(500)),
        ..Default::default()
    };
    assert!(matches!(
        mm.update_config(&update),
        Err(MarketMakerError::InvalidConfig(_))
    ));
    assert_eq!(mm.config(), &before);
}

#[test]
fn test_config_update_cannot_open_position_from_flat() {
    let (mut mm, _) = setup(MarketMakerConfig::default());
    let before = mm.config().clone();
    let spread_before = mm.spread_model().config().clone();

    let update = MarketMakerConfigUpdate {
        order_size: Some(dec!(3)),
        spread: SpreadConfigUpdate {
            base_spread: Some(dec!(0.004)),
            ..Default::default()
        },
        inventory: InventoryConfigUpdate {
            min_inventory: Some(dec!(100)),
            max_inventory: Some(dec!(500)),
            target_inventory: Some(dec!(300)),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        mm.update_config(&update),
        Err(MarketMakerError::InvalidConfig(_))
    ));

    assert_eq!(mm.config(), &before);
    assert_eq!(mm.spread_model().config(), &spread_before);
    assert_eq!(mm.ledger().current_inventory(), Decimal::ZERO);
    assert_eq!(mm.get_stats().net_pnl, Decimal::ZERO);
}

#[test]
fn test_pool_runs_independently_of_inventory() {
    let (mut mm, _) = setup(MarketMakerConfig::default());

    let minted = mm.initialize_pool(dec!(10000), dec!(15000)).unwrap();
    assert_eq!(minted, mm.pool_state().lp_token_supply);
    assert_eq!(mm.pool_price(), dec!(1.5));

    let swap = mm.execute_swap(dec!(100), Token::A, dec!(148)).unwrap();
    assert_eq!(swap.fee_amount, dec!(0.3));

    // Slippage errors come through unchanged
    let err = mm.execute_swap(dec!(100), Token::A, dec!(1000)).unwrap_err();
    assert!(matches!(
        err,
        MarketMakerError::Pool(PoolError::SlippageExceeded { .. })
    ));
    assert_eq!(
        mm.initialize_pool(dec!(1), dec!(1)),
        Err(MarketMakerError::Pool(PoolError::AlreadyInitialized))
    );

    let needed = mm.pool_amount_in(dec!(10), Token::B).unwrap();
    assert!(needed > Decimal::ZERO);

    let stats = mm.get_stats();
    assert_eq!(stats.trade_count, 0);
    assert_eq!(stats.inventory.current_inventory, Decimal::ZERO);
    assert_eq!(stats.realized_pnl, Decimal::ZERO);
}

#[test]
fn test_uptime_follows_clock() {
    let (mm, clock) = setup(MarketMakerConfig::default());
    clock.advance(Duration::seconds(90));
    assert_eq!(mm.get_stats().uptime, Duration::seconds(90));
}
