//! The exchange facade
//!
//! Owns the registry, ledger, order store, per-pair books, and the matcher,
//! and keeps them consistent: an order is only ever in a book while its
//! escrow is locked, and every book entry has an active order behind it.
//!
//! Matching is explicit: placement only rests orders, and a separate
//! `match_orders` call drains the crossed region under a level budget.

use std::collections::HashMap;
use tracing::{debug, info};

use ledger::{Ledger, LedgerError};
use matching_engine::{Book, DepthLevel, Matcher, OrderStore};
use serde::{Deserialize, Serialize};
use types::balance::Balance;
use types::ids::{AssetId, OrderId, PairId, TraderId};
use types::numeric::{Amount, Price};
use types::order::{CancelReason, Order, Side};
use types::pair::Pair;

use crate::error::ExchangeError;
use crate::events::{
    Deposited, ExchangeEvent, OrderCancelled, OrderPlaced, PairCreated, TradeExecuted, Withdrawn,
};
use crate::registry::PairRegistry;

/// One order of a batch placement request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
    pub expiry: u64,
}

/// Aggregated view of the top of both sides of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Best bids first (descending price)
    pub bids: Vec<DepthLevel>,
    /// Best asks first (ascending price)
    pub asks: Vec<DepthLevel>,
}

/// Single-threaded exchange state
///
/// All mutating operations take `&mut self`; callers needing concurrency put
/// the whole exchange behind one lock.
#[derive(Debug)]
pub struct Exchange {
    registry: PairRegistry,
    ledger: Ledger,
    store: OrderStore,
    books: HashMap<PairId, Book>,
    matcher: Matcher,
    /// Emitted events log (append-only until drained)
    events: Vec<ExchangeEvent>,
}

impl Exchange {
    pub fn new() -> Self {
        Self {
            registry: PairRegistry::new(),
            ledger: Ledger::new(),
            store: OrderStore::new(),
            books: HashMap::new(),
            matcher: Matcher::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Pair listing ─────────────────────────

    pub fn create_pair(
        &mut self,
        base: AssetId,
        quote: AssetId,
        tick_size: Price,
        min_order_size: Amount,
    ) -> Result<PairId, ExchangeError> {
        let pair_id = self
            .registry
            .create(base.clone(), quote.clone(), tick_size, min_order_size)?;
        self.books.insert(pair_id, Book::new());

        info!(%pair_id, %base, %quote, "Pair created");
        self.events.push(ExchangeEvent::PairCreated(PairCreated {
            pair_id,
            base,
            quote,
            tick_size,
            min_order_size,
        }));
        Ok(pair_id)
    }

    // ───────────────────────── Funds ─────────────────────────

    pub fn deposit(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        self.ledger.deposit(trader, asset, amount)?;
        debug!(%trader, %asset, %amount, "Deposit");
        self.events.push(ExchangeEvent::Deposited(Deposited {
            trader,
            asset: asset.clone(),
            amount,
        }));
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        trader: TraderId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        self.ledger.withdraw(trader, asset, amount)?;
        debug!(%trader, %asset, %amount, "Withdrawal");
        self.events.push(ExchangeEvent::Withdrawn(Withdrawn {
            trader,
            asset: asset.clone(),
            amount,
        }));
        Ok(())
    }

    // ───────────────────────── Order entry ─────────────────────────

    /// Place a limit order: validate, escrow, record, rest in the book.
    ///
    /// A bid escrows `amount x price` of quote; an ask escrows `amount` of
    /// base. The order rests even if it crosses; a `match_orders` call
    /// executes crossed orders.
    #[allow(clippy::too_many_arguments)]
    pub fn place_limit_order(
        &mut self,
        trader: TraderId,
        pair_id: PairId,
        side: Side,
        price: Price,
        amount: Amount,
        expiry: u64,
        now: u64,
    ) -> Result<OrderId, ExchangeError> {
        let pair = self.registry.get(pair_id)?.clone();
        OrderStore::validate(&pair, price, amount)?;

        let (escrow_asset, escrow_amount) = Self::escrow_for(&pair, side, price, amount)?;
        self.ledger.lock(trader, &escrow_asset, escrow_amount)?;

        // Validation already passed; only a bad expiry can fail here, and it
        // must unwind the escrow.
        let order_id = match self.store.create(trader, &pair, side, price, amount, expiry, now) {
            Ok(order_id) => order_id,
            Err(err) => {
                self.ledger.release(trader, &escrow_asset, escrow_amount)?;
                return Err(err.into());
            }
        };
        self.book_mut(pair_id)?.insert(side, price, order_id, amount);

        debug!(%order_id, %trader, %pair_id, ?side, %price, %amount, "Order placed");
        self.events.push(ExchangeEvent::OrderPlaced(OrderPlaced {
            order_id,
            trader,
            pair_id,
            side,
            price,
            amount,
        }));
        Ok(order_id)
    }

    /// Place several orders atomically: either every entry is accepted, or
    /// none is and no balance moves.
    ///
    /// Validation covers each entry's parameters and the trader's aggregate
    /// escrow across the whole batch, so the placement loop cannot fail.
    pub fn batch_place_orders(
        &mut self,
        trader: TraderId,
        pair_id: PairId,
        entries: &[BatchEntry],
        now: u64,
    ) -> Result<Vec<OrderId>, ExchangeError> {
        let pair = self.registry.get(pair_id)?.clone();

        let mut base_needed = Amount::zero();
        let mut quote_needed = Amount::zero();
        for (index, entry) in entries.iter().enumerate() {
            let reject = |reason: String| ExchangeError::BatchValidationFailed { index, reason };

            OrderStore::validate(&pair, entry.price, entry.amount)
                .map_err(|e| reject(e.to_string()))?;
            if entry.expiry != 0 && entry.expiry <= now {
                return Err(reject(format!("expiry {} is not in the future", entry.expiry)));
            }

            let (_, escrow) = Self::escrow_for(&pair, entry.side, entry.price, entry.amount)
                .map_err(|e| reject(e.to_string()))?;
            let total = match entry.side {
                Side::Bid => &mut quote_needed,
                Side::Ask => &mut base_needed,
            };
            *total = total
                .checked_add(escrow)
                .ok_or_else(|| reject(LedgerError::Overflow.to_string()))?;
        }

        self.check_batch_escrow(&trader, &pair.base, base_needed)?;
        self.check_batch_escrow(&trader, &pair.quote, quote_needed)?;

        let mut order_ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let order_id = self.place_limit_order(
                trader,
                pair_id,
                entry.side,
                entry.price,
                entry.amount,
                entry.expiry,
                now,
            )?;
            order_ids.push(order_id);
        }
        info!(%trader, %pair_id, count = order_ids.len(), "Batch placed");
        Ok(order_ids)
    }

    /// Cancel an active order on behalf of its owner and refund the escrow
    /// backing its unfilled remainder.
    ///
    /// Returns the refunded amount.
    pub fn cancel_order(
        &mut self,
        trader: TraderId,
        order_id: OrderId,
    ) -> Result<Amount, ExchangeError> {
        let order = self
            .store
            .get(&order_id)
            .ok_or(matching_engine::OrderError::NotFound { order_id })?;
        let (pair_id, side, price) = (order.pair_id, order.side, order.price);

        let remaining = self.store.cancel(&order_id, &trader)?;
        self.book_mut(pair_id)?.remove(side, price, &order_id);

        let pair = self.registry.get(pair_id)?.clone();
        let (refund_asset, refund) = Self::escrow_for(&pair, side, price, remaining)?;
        self.ledger.release(trader, &refund_asset, refund)?;

        info!(%order_id, %trader, %refund, "Order cancelled");
        self.events.push(ExchangeEvent::OrderCancelled(OrderCancelled {
            order_id,
            reason: CancelReason::UserRequested,
            refund_amount: refund,
        }));
        Ok(refund)
    }

    // ───────────────────────── Matching ─────────────────────────

    /// Run one bounded matching pass over a pair's book.
    ///
    /// At most `max_levels` price levels are fully drained; callers drain a
    /// deep crossed region with repeated passes. Returns the number of fills.
    pub fn match_orders(
        &mut self,
        pair_id: PairId,
        max_levels: u32,
        now: u64,
    ) -> Result<usize, ExchangeError> {
        let pair = self.registry.get(pair_id)?.clone();
        let book = self
            .books
            .get_mut(&pair_id)
            .ok_or(ExchangeError::PairNotFound { pair_id })?;

        let outcome =
            self.matcher
                .match_pair(&pair, book, &mut self.store, &mut self.ledger, max_levels, now)?;

        for order_id in &outcome.expired {
            let order = self
                .store
                .get(order_id)
                .ok_or(matching_engine::MatchError::MissingOrder { order_id: *order_id })?;
            let (_, refund) = Self::escrow_for(&pair, order.side, order.price, order.amount)?;
            self.events.push(ExchangeEvent::OrderCancelled(OrderCancelled {
                order_id: *order_id,
                reason: CancelReason::Expired,
                refund_amount: refund,
            }));
        }
        for fill in &outcome.fills {
            self.events.push(ExchangeEvent::TradeExecuted(TradeExecuted {
                pair_id,
                sequence: fill.sequence,
                buy_order_id: fill.buy_order_id,
                sell_order_id: fill.sell_order_id,
                maker_order_id: fill.maker_order_id,
                price: fill.price,
                amount: fill.amount,
                quote_amount: fill.quote_amount,
            }));
        }

        info!(
            %pair_id,
            fills = outcome.fills.len(),
            expired = outcome.expired.len(),
            levels = outcome.levels_exhausted,
            "Matching pass complete"
        );
        Ok(outcome.fills.len())
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn get_pair(&self, pair_id: PairId) -> Result<&Pair, ExchangeError> {
        self.registry.get(pair_id)
    }

    pub fn get_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.store.get(order_id)
    }

    pub fn get_user_balance(&self, trader: &TraderId, asset: &AssetId) -> Balance {
        self.ledger.balance(trader, asset)
    }

    pub fn get_best_bid(&self, pair_id: PairId) -> Result<Option<Price>, ExchangeError> {
        Ok(self.book(pair_id)?.best_bid())
    }

    pub fn get_best_ask(&self, pair_id: PairId) -> Result<Option<Price>, ExchangeError> {
        Ok(self.book(pair_id)?.best_ask())
    }

    /// Top `max_levels` of both sides, most aggressive prices first.
    pub fn get_order_book_depth(
        &self,
        pair_id: PairId,
        max_levels: usize,
    ) -> Result<DepthSnapshot, ExchangeError> {
        let book = self.book(pair_id)?;
        Ok(DepthSnapshot {
            bids: book.bids.depth(max_levels),
            asks: book.asks.depth(max_levels),
        })
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Escrow (asset, amount) backing an order of `amount` at `price`
    fn escrow_for(
        pair: &Pair,
        side: Side,
        price: Price,
        amount: Amount,
    ) -> Result<(AssetId, Amount), ExchangeError> {
        match side {
            Side::Bid => {
                let quote_amount = amount
                    .checked_mul_price(price)
                    .ok_or(LedgerError::Overflow)?;
                Ok((pair.quote.clone(), quote_amount))
            }
            Side::Ask => Ok((pair.base.clone(), amount)),
        }
    }

    fn check_batch_escrow(
        &self,
        trader: &TraderId,
        asset: &AssetId,
        needed: Amount,
    ) -> Result<(), ExchangeError> {
        if needed.is_zero() {
            return Ok(());
        }
        let available = self.ledger.balance(trader, asset).available;
        if available < needed {
            return Err(LedgerError::InsufficientBalance {
                asset: asset.to_string(),
                required: needed.to_string(),
                available: available.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn book(&self, pair_id: PairId) -> Result<&Book, ExchangeError> {
        self.books
            .get(&pair_id)
            .ok_or(ExchangeError::PairNotFound { pair_id })
    }

    fn book_mut(&mut self, pair_id: PairId) -> Result<&mut Book, ExchangeError> {
        self.books
            .get_mut(&pair_id)
            .ok_or(ExchangeError::PairNotFound { pair_id })
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
