//! Bounded trade history
//!
//! Once the length passes `capacity`, the oldest trades are dropped until
//! only `retain` remain. Aggregates computed over the history therefore see a
//! sliding window, not the full lifetime.

use std::collections::VecDeque;

use kestrel_core::Trade;

#[derive(Debug, Clone)]
pub struct TradeHistory {
    trades: VecDeque<Trade>,
    capacity: usize,
    retain: usize,
}

impl TradeHistory {
    /// `retain` is capped at `capacity`
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            trades: VecDeque::with_capacity(capacity.min(4096) + 1),
            capacity,
            retain: retain.min(capacity),
        }
    }

    /// Append a trade. Returns the number of trades evicted.
    pub fn push(&mut self, trade: Trade) -> usize {
        self.trades.push_back(trade);
        if self.trades.len() > self.capacity {
            self.evict_to(self.retain)
        } else {
            0
        }
    }

    /// Change the limits, evicting immediately if the history is now too long
    pub fn set_limits(&mut self, capacity: usize, retain: usize) -> usize {
        self.capacity = capacity;
        self.retain = retain.min(capacity);
        if self.trades.len() > self.capacity {
            self.evict_to(self.retain)
        } else {
            0
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    /// Up to `n` most recent trades, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Trade> {
        self.trades.iter().rev().take(n)
    }

    pub fn last(&self) -> Option<&Trade> {
        self.trades.back()
    }

    fn evict_to(&mut self, keep: usize) -> usize {
        let evicted = self.trades.len().saturating_sub(keep);
        self.trades.drain(..evicted);
        evicted
    }
}
