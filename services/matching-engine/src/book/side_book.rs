//! One side of an order book
//!
//! Price levels live in a `BTreeMap` keyed by price, so the best level is
//! always at one end: the highest key for bids, the lowest for asks. Empty
//! levels are removed immediately, which keeps "number of levels" meaningful
//! for the matcher's work budget.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Amount, Price};
use types::order::Side;

use super::price_level::PriceLevel;
use super::DepthLevel;

/// All resting orders on one side of a pair's book
#[derive(Debug)]
pub struct SideBook {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Best price on this side: highest bid, lowest ask
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    /// Best price together with the front order of its FIFO queue
    pub fn peek_best(&self) -> Option<(Price, OrderId, Amount)> {
        let price = self.best_price()?;
        let level = self.levels.get(&price)?;
        let (order_id, remaining) = level.peek_front()?;
        Some((price, order_id, remaining))
    }

    /// Rest an order at its limit price, behind everything already there
    pub fn insert(&mut self, price: Price, order_id: OrderId, remaining: Amount) {
        self.levels.entry(price).or_default().insert(order_id, remaining);
    }

    /// Remove a resting order; drops the level if it becomes empty.
    ///
    /// Returns the removed remaining amount, None if the order is not here.
    pub fn remove(&mut self, price: Price, order_id: &OrderId) -> Option<Amount> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// Fill the front order of the best level.
    ///
    /// Returns true if the fill emptied the level (the level is removed).
    ///
    /// # Panics
    /// Panics if the side is empty. The matcher peeks before it reduces.
    pub fn reduce_best(&mut self, fill: Amount) -> bool {
        let price = self.best_price().expect("reduce_best on empty side");
        let level = self.levels.get_mut(&price).expect("best level exists");
        level.reduce_front(fill);
        if level.is_empty() {
            self.levels.remove(&price);
            return true;
        }
        false
    }

    /// Aggregate the best `max_levels` price levels, most aggressive first.
    ///
    /// Returns fewer entries when the side has fewer levels.
    pub fn depth(&self, max_levels: usize) -> Vec<DepthLevel> {
        let iter: Box<dyn Iterator<Item = (&Price, &PriceLevel)>> = match self.side {
            Side::Bid => Box::new(self.levels.iter().rev()),
            Side::Ask => Box::new(self.levels.iter()),
        };
        iter.take(max_levels)
            .map(|(price, level)| DepthLevel {
                price: *price,
                total_amount: level.total_amount(),
                order_count: level.order_count(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
