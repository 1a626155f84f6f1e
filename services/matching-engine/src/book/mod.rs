//! Per-pair order book
//!
//! A `Book` is the pair of side books for one trading pair. It only tracks
//! active resting orders; the order store remains the source of truth for
//! order state.

pub mod price_level;
pub mod side_book;

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::numeric::{Amount, Price};
use types::order::Side;

pub use price_level::PriceLevel;
pub use side_book::SideBook;

/// One aggregated price level in a depth snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    pub total_amount: Amount,
    pub order_count: usize,
}

/// Bid and ask books for a single pair
#[derive(Debug)]
pub struct Book {
    pub bids: SideBook,
    pub asks: SideBook,
}

impl Book {
    pub fn new() -> Self {
        Self {
            bids: SideBook::new(Side::Bid),
            asks: SideBook::new(Side::Ask),
        }
    }

    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Rest an order on its side
    pub fn insert(&mut self, side: Side, price: Price, order_id: OrderId, remaining: Amount) {
        self.side_mut(side).insert(price, order_id, remaining);
    }

    /// Remove a resting order from its side
    pub fn remove(&mut self, side: Side, price: Price, order_id: &OrderId) -> Option<Amount> {
        self.side_mut(side).remove(price, order_id)
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}
