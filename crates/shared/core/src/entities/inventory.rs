use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Snapshot of the inventory ledger, passed by value into the spread model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    /// Signed position (positive = long)
    pub current_inventory: Decimal,
    pub target_inventory: Decimal,
    /// Position normalized into [0, 1] across [min, max]
    pub inventory_ratio: Decimal,
    /// tanh-bounded deviation from target, in (-1, 1)
    pub skew_factor: Decimal,
    pub max_inventory: Decimal,
    pub min_inventory: Decimal,
}

impl InventoryState {
    /// Derive ratio and skew from raw ledger fields.
    ///
    /// `min_inventory < max_inventory` is expected; a degenerate range
    /// yields a neutral ratio of 0.5 and zero skew.
    pub fn new(
        current_inventory: Decimal,
        target_inventory: Decimal,
        min_inventory: Decimal,
        max_inventory: Decimal,
        skew_sensitivity: Decimal,
    ) -> Self {
        let range = max_inventory - min_inventory;
        let (inventory_ratio, skew_factor) = if range > Decimal::ZERO {
            let ratio = ((current_inventory - min_inventory) / range)
                .clamp(Decimal::ZERO, Decimal::ONE);
            let deviation = (current_inventory - target_inventory) / range;
            (ratio, tanh(deviation * skew_sensitivity))
        } else {
            (dec!(0.5), Decimal::ZERO)
        };

        Self {
            current_inventory,
            target_inventory,
            inventory_ratio,
            skew_factor,
            max_inventory,
            min_inventory,
        }
    }

    /// Flat book in a symmetric range: ratio 0.5, no skew
    pub fn neutral(limit: Decimal) -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, -limit, limit, Decimal::ONE)
    }

    pub fn is_long(&self) -> bool {
        self.current_inventory > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.current_inventory < Decimal::ZERO
    }
}

/// Hyperbolic tangent on decimals.
///
/// |x| is capped at 20, where tanh is already within 1e-17 of ±1,
/// so exp never overflows.
fn tanh(x: Decimal) -> Decimal {
    let x = x.clamp(dec!(-20), dec!(20));
    let e2x = (x * Decimal::TWO).exp();
    (e2x - Decimal::ONE) / (e2x + Decimal::ONE)
}
