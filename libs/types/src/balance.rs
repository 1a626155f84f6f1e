//! Custodial balance primitives
//!
//! Invariant: total = available + locked. The locked portion is escrow held
//! against resting orders; the available portion is free for withdrawal or
//! new escrow.

use crate::numeric::Amount;
use serde::{Deserialize, Serialize};

/// Balance of one asset for one trader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total: Amount,
    pub available: Amount,
    pub locked: Amount,
}

impl Balance {
    /// Create an empty balance
    pub fn new() -> Self {
        Self {
            total: Amount::zero(),
            available: Amount::zero(),
            locked: Amount::zero(),
        }
    }

    /// Check balance invariant: total = available + locked
    pub fn check_invariant(&self) -> bool {
        self.total == self.available + self.locked
    }

    /// Lock a portion of available balance as escrow
    ///
    /// # Panics
    /// Panics if amount exceeds available. Callers validate first.
    pub fn lock(&mut self, amount: Amount) {
        assert!(amount <= self.available, "Insufficient available balance");

        self.available = self.available - amount;
        self.locked = self.locked + amount;

        assert!(self.check_invariant(), "Invariant violated after lock");
    }

    /// Return escrow to the available balance
    ///
    /// # Panics
    /// Panics if amount exceeds locked. Callers validate first.
    pub fn unlock(&mut self, amount: Amount) {
        assert!(amount <= self.locked, "Insufficient locked balance");

        self.locked = self.locked - amount;
        self.available = self.available + amount;

        assert!(self.check_invariant(), "Invariant violated after unlock");
    }

    /// Spend escrow outright (settlement leg leaving this trader)
    ///
    /// # Panics
    /// Panics if amount exceeds locked. Callers validate first.
    pub fn deduct_locked(&mut self, amount: Amount) {
        assert!(amount <= self.locked, "Insufficient locked balance");

        self.locked = self.locked - amount;
        self.total = self.total - amount;

        assert!(self.check_invariant(), "Invariant violated after deduct");
    }

    /// Spend from the available balance (withdrawal)
    ///
    /// # Panics
    /// Panics if amount exceeds available. Callers validate first.
    pub fn deduct_available(&mut self, amount: Amount) {
        assert!(amount <= self.available, "Insufficient available balance");

        self.available = self.available - amount;
        self.total = self.total - amount;

        assert!(self.check_invariant(), "Invariant violated after deduct");
    }

    /// Credit the available balance (deposit, settlement leg arriving)
    pub fn credit(&mut self, amount: Amount) {
        self.available = self.available + amount;
        self.total = self.total + amount;

        assert!(self.check_invariant(), "Invariant violated after credit");
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::new()
    }
}
