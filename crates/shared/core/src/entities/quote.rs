use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Two-sided quote produced by the spread model. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid_price: Decimal,
    pub bid_size: Decimal,
    pub ask_price: Decimal,
    pub ask_size: Decimal,
    /// ask_price - bid_price
    pub spread: Decimal,
    pub mid_price: Decimal,
}

impl Quote {
    pub fn new(
        bid_price: Decimal,
        bid_size: Decimal,
        ask_price: Decimal,
        ask_size: Decimal,
        mid_price: Decimal,
    ) -> Self {
        Self {
            bid_price,
            bid_size,
            ask_price,
            ask_size,
            spread: ask_price - bid_price,
            mid_price,
        }
    }

    /// Spread as a fraction of mid price (zero when mid is zero)
    pub fn relative_spread(&self) -> Decimal {
        if self.mid_price.is_zero() {
            return Decimal::ZERO;
        }
        self.spread / self.mid_price
    }
}
