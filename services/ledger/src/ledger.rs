//! Ledger — per-(trader, asset) balance tracking and settlement
//!
//! Balances are stored as `HashMap<TraderId, HashMap<AssetId, Balance>>`.
//! Escrow is modeled with the locked portion of `Balance`: `lock` moves
//! available funds into escrow at order-placement time, `release` moves them
//! back on cancellation or over-escrow refund, and `settle` spends escrow on
//! both legs of a match atomically.
//!
//! All operations are all-or-nothing: every precondition is checked before
//! the first mutation.

use std::collections::HashMap;
use types::balance::Balance;
use types::ids::{AssetId, TraderId};
use types::numeric::Amount;

use crate::error::LedgerError;

/// Custodial balance ledger
#[derive(Debug, Default)]
pub struct Ledger {
    /// Balances: trader -> (asset -> balance)
    balances: HashMap<TraderId, HashMap<AssetId, Balance>>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    // ───────────────────────── Deposit / Withdraw ─────────────────────────

    /// Credit a trader's available balance unconditionally.
    pub fn deposit(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }

        let balance = self.balance_entry(trader, asset);
        if balance.total.checked_add(amount).is_none() {
            return Err(LedgerError::Overflow);
        }
        balance.credit(amount);
        Ok(())
    }

    /// Debit a trader's available balance.
    pub fn withdraw(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        self.check_available(&trader, asset, amount)?;

        self.balance_entry(trader, asset).deduct_available(amount);
        Ok(())
    }

    // ───────────────────────── Escrow ─────────────────────────

    /// Move available funds into escrow at order-placement time.
    pub fn lock(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        self.check_available(&trader, asset, amount)?;

        self.balance_entry(trader, asset).lock(amount);
        Ok(())
    }

    /// Return escrow to the available balance (cancel refund, unfilled
    /// remainder, price-improvement refund). A zero amount is a no-op.
    pub fn release(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.check_locked(&trader, asset, amount)?;

        self.balance_entry(trader, asset).unlock(amount);
        Ok(())
    }

    // ───────────────────────── Settlement ─────────────────────────

    /// Settle one fill: spend `base_amount` of the seller's base escrow into
    /// the buyer's available balance, and `quote_amount` of the buyer's quote
    /// escrow into the seller's available balance.
    ///
    /// Both escrow preconditions are checked before any mutation, so a
    /// failure leaves every balance untouched. Buyer and seller may be the
    /// same trader (a self-cross); the legs still conserve totals.
    pub fn settle(
        &mut self,
        buyer: TraderId,
        seller: TraderId,
        base: &AssetId,
        quote: &AssetId,
        base_amount: Amount,
        quote_amount: Amount,
    ) -> Result<(), LedgerError> {
        self.check_locked(&seller, base, base_amount)?;
        self.check_locked(&buyer, quote, quote_amount)?;

        self.balance_entry(seller, base).deduct_locked(base_amount);
        self.balance_entry(buyer, base).credit(base_amount);

        self.balance_entry(buyer, quote).deduct_locked(quote_amount);
        self.balance_entry(seller, quote).credit(quote_amount);

        Ok(())
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Free (available) balance for a trader/asset; zero if never touched.
    pub fn available(&self, trader: &TraderId, asset: &AssetId) -> Amount {
        self.get(trader, asset)
            .map(|b| b.available)
            .unwrap_or_else(Amount::zero)
    }

    /// Escrowed balance for a trader/asset.
    pub fn locked(&self, trader: &TraderId, asset: &AssetId) -> Amount {
        self.get(trader, asset)
            .map(|b| b.locked)
            .unwrap_or_else(Amount::zero)
    }

    /// Full balance breakdown for a trader/asset.
    pub fn balance(&self, trader: &TraderId, asset: &AssetId) -> Balance {
        self.get(trader, asset).cloned().unwrap_or_default()
    }

    /// Sum of all traders' total balances for one asset. Used by the
    /// conservation checks: it may only change through deposit/withdraw.
    pub fn asset_total(&self, asset: &AssetId) -> Amount {
        self.balances
            .values()
            .filter_map(|assets| assets.get(asset))
            .fold(Amount::zero(), |acc, b| acc + b.total)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn get(&self, trader: &TraderId, asset: &AssetId) -> Option<&Balance> {
        self.balances.get(trader).and_then(|assets| assets.get(asset))
    }

    fn balance_entry(&mut self, trader: TraderId, asset: &AssetId) -> &mut Balance {
        self.balances
            .entry(trader)
            .or_default()
            .entry(asset.clone())
            .or_default()
    }

    fn check_available(
        &self,
        trader: &TraderId,
        asset: &AssetId,
        required: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.available(trader, asset);
        if available < required {
            return Err(LedgerError::InsufficientBalance {
                asset: asset.to_string(),
                required: required.to_string(),
                available: available.to_string(),
            });
        }
        Ok(())
    }

    fn check_locked(
        &self,
        trader: &TraderId,
        asset: &AssetId,
        required: Amount,
    ) -> Result<(), LedgerError> {
        let locked = self.locked(trader, asset);
        if locked < required {
            return Err(LedgerError::InsufficientLocked {
                asset: asset.to_string(),
                required: required.to_string(),
                locked: locked.to_string(),
            });
        }
        Ok(())
    }
}
