use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// ```text
/// Pending ──fill──► Partial ──fill──► Filled
///    │                 │
///    └──────cancel─────┴──► Cancelled
/// ```
///
/// `Rejected` is assigned at creation when an order cannot be sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is resting with nothing filled
    Pending,
    /// Order has been partially filled
    Partial,
    /// Order has been completely filled
    Filled,
    /// Order was cancelled by the owner
    Cancelled,
    /// Order could not be placed
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }

    /// Returns true if the order can still be filled or cancelled
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Partial)
    }
}
