use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time market data for one symbol, produced outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub last_price: Decimal,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
    pub volume_24h: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    /// Caller-defined volatility measure (annualized or realized)
    pub volatility: Decimal,
}

impl MarketSnapshot {
    /// Snapshot with a top of book; last price defaults to the mid and
    /// statistics default to zero.
    pub fn new(symbol: impl Into<String>, bid_price: Decimal, ask_price: Decimal) -> Self {
        let mid = (bid_price + ask_price) / Decimal::TWO;
        Self {
            symbol: symbol.into(),
            last_price: mid,
            bid_price,
            ask_price,
            volume_24h: Decimal::ZERO,
            high_24h: mid,
            low_24h: mid,
            volatility: Decimal::ZERO,
        }
    }

    pub fn with_last_price(mut self, last_price: Decimal) -> Self {
        self.last_price = last_price;
        self
    }

    pub fn with_volume_24h(mut self, volume_24h: Decimal) -> Self {
        self.volume_24h = volume_24h;
        self
    }

    pub fn with_range(mut self, high_24h: Decimal, low_24h: Decimal) -> Self {
        self.high_24h = high_24h;
        self.low_24h = low_24h;
        self
    }

    pub fn with_volatility(mut self, volatility: Decimal) -> Self {
        self.volatility = volatility;
        self
    }

    /// Mid of the touch when both sides are quoted, otherwise the last price
    pub fn mid_price(&self) -> Decimal {
        if self.bid_price > Decimal::ZERO && self.ask_price > Decimal::ZERO {
            (self.bid_price + self.ask_price) / Decimal::TWO
        } else {
            self.last_price
        }
    }
}
