use chrono::Duration;
use kestrel_core::{InventoryState, Side, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time summary of the market maker
#[derive(Debug, Clone, PartialEq)]
pub struct MarketMakerStats {
    pub symbol: String,
    pub open_orders: usize,
    /// Lifetime fill count, unaffected by history eviction
    pub trade_count: u64,
    /// Trades currently retained in history
    pub history_len: usize,
    /// Lifetime base volume filled
    pub total_volume: Decimal,
    pub total_notional: Decimal,
    pub realized_pnl: Decimal,
    /// Marked at the last seen mid; zero before any market data
    pub unrealized_pnl: Decimal,
    pub total_fees: Decimal,
    /// realized + unrealized - fees
    pub net_pnl: Decimal,
    pub inventory: InventoryState,
    pub avg_entry_price: Decimal,
    pub uptime: Duration,
}

/// Aggregates over the retained trade window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub trade_count: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub buy_volume: Decimal,
    pub sell_volume: Decimal,
    /// Volume-weighted average buy price, zero without buys
    pub avg_buy_price: Decimal,
    /// Volume-weighted average sell price, zero without sells
    pub avg_sell_price: Decimal,
    pub total_notional: Decimal,
    pub total_fees: Decimal,
}

impl TradeStats {
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut stats = TradeStats::default();
        let mut buy_notional = Decimal::ZERO;
        let mut sell_notional = Decimal::ZERO;

        for trade in trades {
            stats.trade_count += 1;
            stats.total_fees += trade.fee;
            match trade.side {
                Side::Buy => {
                    stats.buy_count += 1;
                    stats.buy_volume += trade.size;
                    buy_notional += trade.notional();
                }
                Side::Sell => {
                    stats.sell_count += 1;
                    stats.sell_volume += trade.size;
                    sell_notional += trade.notional();
                }
            }
        }

        if stats.buy_volume > Decimal::ZERO {
            stats.avg_buy_price = buy_notional / stats.buy_volume;
        }
        if stats.sell_volume > Decimal::ZERO {
            stats.avg_sell_price = sell_notional / stats.sell_volume;
        }
        stats.total_notional = buy_notional + sell_notional;
        stats
    }

    /// Buy volume minus sell volume
    pub fn net_volume(&self) -> Decimal {
        self.buy_volume - self.sell_volume
    }
}
