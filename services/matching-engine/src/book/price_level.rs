//! Price level with FIFO queue
//!
//! A price level holds the open remainders of every active order resting at
//! one price, in arrival order. The front of the queue is always the next
//! order to fill at this price.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Amount;

/// Entry in the price level queue
///
/// `remaining` mirrors the store's open amount for the order: every fill
/// reduces both in the same step, and the matcher debug-asserts the two
/// agree before executing against a head.
#[derive(Debug, Clone)]
struct LevelEntry {
    order_id: OrderId,
    remaining: Amount,
}

/// All resting orders at a single price, FIFO
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<LevelEntry>,
    /// Sum of all remaining amounts in the queue
    total_amount: Amount,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_amount: Amount::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority)
    pub fn insert(&mut self, order_id: OrderId, remaining: Amount) {
        self.orders.push_back(LevelEntry { order_id, remaining });
        self.total_amount = self.total_amount + remaining;
    }

    /// Remove an order anywhere in the queue.
    ///
    /// Returns its remaining amount, or None if it is not at this level.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Amount> {
        let position = self.orders.iter().position(|e| &e.order_id == order_id)?;
        let entry = self.orders.remove(position)?;
        self.total_amount = self.total_amount - entry.remaining;
        Some(entry.remaining)
    }

    /// The next order to fill at this price
    pub fn peek_front(&self) -> Option<(OrderId, Amount)> {
        self.orders.front().map(|e| (e.order_id, e.remaining))
    }

    /// Reduce the front order by a fill; a fully consumed order leaves the
    /// queue.
    ///
    /// # Panics
    /// Panics if the level is empty or the fill exceeds the front remainder.
    /// The matcher only fills what `peek_front` reported.
    pub fn reduce_front(&mut self, fill: Amount) {
        let entry = self.orders.front_mut().expect("reduce_front on empty level");
        entry.remaining = entry.remaining - fill;
        if entry.remaining.is_zero() {
            self.orders.pop_front();
        }
        self.total_amount = self.total_amount - fill;
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}
