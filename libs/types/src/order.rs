//! Order lifecycle types
//!
//! An order is created Active, its remaining amount only ever decreases, and
//! its status moves one-way into Filled or Cancelled. Terminal states never
//! revert.

use crate::ids::{OrderId, PairId, TraderId};
use crate::numeric::{Amount, Price};
use serde::{Deserialize, Serialize};

/// Order side (bid = buy, ask = sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    pub fn is_bid(&self) -> bool {
        matches!(self, Side::Bid)
    }
}

/// Why a cancelled order was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    /// Cancelled by its owner
    UserRequested,
    /// Expiry timestamp passed before the order could fill
    Expired,
}

/// Order status with one-way transitions
///
/// Active -> Filled or Active -> Cancelled; Filled and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason")]
pub enum OrderStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "FILLED")]
    Filled,
    #[serde(rename = "CANCELLED")]
    Cancelled(CancelReason),
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled(_))
    }
}

/// A resting or historical limit order
///
/// `amount` is the remaining open quantity; `original_amount` never changes.
/// `timestamp` is a store-assigned logical sequence used for FIFO tie-breaks,
/// not a wall clock. `expiry` of 0 means the order never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub trader: TraderId,
    pub pair_id: PairId,
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
    pub original_amount: Amount,
    pub timestamp: u64,
    pub expiry: u64,
    pub status: OrderStatus,
}

impl Order {
    /// Create a new active order
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: OrderId,
        trader: TraderId,
        pair_id: PairId,
        side: Side,
        price: Price,
        amount: Amount,
        timestamp: u64,
        expiry: u64,
    ) -> Self {
        Self {
            order_id,
            trader,
            pair_id,
            side,
            price,
            amount,
            original_amount: amount,
            timestamp,
            expiry,
            status: OrderStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::Active)
    }

    /// Quantity already executed
    pub fn filled_amount(&self) -> Amount {
        self.original_amount - self.amount
    }

    /// Check whether the order has passed its expiry at logical time `now`.
    /// Orders with expiry 0 never expire.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiry != 0 && self.expiry <= now
    }

    /// Reduce the remaining amount by a fill; reaching zero sets Filled.
    ///
    /// # Panics
    /// Panics if the order is not active or the fill exceeds the remainder.
    /// Callers validate both before invoking.
    pub fn fill(&mut self, fill_amount: Amount) {
        assert!(self.is_active(), "Cannot fill a terminal order");
        assert!(
            fill_amount <= self.amount,
            "Fill would exceed remaining amount"
        );

        self.amount = self.amount - fill_amount;
        if self.amount.is_zero() {
            self.status = OrderStatus::Filled;
        }
    }

    /// Cancel the order.
    ///
    /// # Panics
    /// Panics if the order is already terminal. Callers validate first.
    pub fn cancel(&mut self, reason: CancelReason) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Cancelled(reason);
    }
}
