use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, Side};

/// Unique identifier for an order, supplied by the caller's id generator
pub type OrderId = String;

/// A resting limit order owned by the market maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    /// Always within `0..=size`
    pub filled_size: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order with explicit timestamp
    pub fn new(
        id: impl Into<OrderId>,
        symbol: impl Into<String>,
        side: Side,
        price: Decimal,
        size: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            price,
            size,
            filled_size: Decimal::ZERO,
            status: OrderStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns remaining size to be filled
    pub fn remaining_size(&self) -> Decimal {
        (self.size - self.filled_size).max(Decimal::ZERO)
    }

    /// Returns true if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled_size >= self.size
    }

    /// Returns the notional value of the order (price * size)
    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }

    /// Apply a fill, capped at the remaining size.
    ///
    /// Returns the size actually applied. Inactive orders absorb nothing.
    pub fn apply_fill(&mut self, fill_size: Decimal, timestamp: DateTime<Utc>) -> Decimal {
        if !self.status.is_active() || fill_size <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let applied = fill_size.min(self.remaining_size());
        self.filled_size += applied;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        self.updated_at = timestamp;
        applied
    }

    /// Transition an active order to cancelled. Returns false if it was already terminal.
    pub fn cancel(&mut self, timestamp: DateTime<Utc>) -> bool {
        if !self.status.is_active() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = timestamp;
        true
    }

    /// Mark the order as rejected
    pub fn reject(&mut self, timestamp: DateTime<Utc>) {
        self.status = OrderStatus::Rejected;
        self.updated_at = timestamp;
    }
}
