use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, Side};

/// Unique identifier for a trade
pub type TradeId = String;

/// An executed fill against one of our orders. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Order that produced this fill (empty for externally injected trades)
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    /// Always positive
    pub price: Decimal,
    /// Always positive
    pub size: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Fee charged for this trade, in quote currency
    pub fee: Decimal,
}

impl Trade {
    /// Create a new trade with explicit timestamp and no fee
    pub fn new(
        id: impl Into<TradeId>,
        symbol: impl Into<String>,
        side: Side,
        price: Decimal,
        size: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            order_id: OrderId::new(),
            symbol: symbol.into(),
            side,
            price,
            size,
            timestamp,
            fee: Decimal::ZERO,
        }
    }

    /// Link the trade to the order it filled
    pub fn with_order_id(mut self, order_id: impl Into<OrderId>) -> Self {
        self.order_id = order_id.into();
        self
    }

    /// Set the fee on the trade
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    /// Returns the notional value of the trade (price * size)
    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }

    /// Position delta: +size for buys, -size for sells
    pub fn signed_size(&self) -> Decimal {
        self.side.sign() * self.size
    }
}
