//! Bounded price-time priority matcher
//!
//! A matching pass repeatedly takes the best bid and best ask heads, and
//! while they cross, fills the overlap at the maker's price and settles it
//! through the ledger. The pass stops once `max_levels` price levels have
//! been fully exhausted, so callers control the worst-case work per call.
//!
//! Expired orders discovered at either head are cancelled and refunded in
//! passing; they do not consume the level budget.

use ledger::Ledger;
use types::fill::Fill;
use types::ids::OrderId;
use types::order::Side;
use types::pair::Pair;

use crate::book::Book;
use crate::error::MatchError;
use crate::matching::crossing::crosses;
use crate::store::OrderStore;

/// Result of one matching pass
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Executed fills, in execution order
    pub fills: Vec<Fill>,
    /// Orders cancelled because their expiry passed
    pub expired: Vec<OrderId>,
    /// Price levels fully consumed; the pass stops at `max_levels`
    pub levels_exhausted: u32,
}

/// Fill producer shared by all pairs
///
/// Holds the global fill sequence so fills across pairs are totally ordered.
#[derive(Debug)]
pub struct Matcher {
    next_sequence: u64,
}

impl Matcher {
    pub fn new() -> Self {
        Self { next_sequence: 1 }
    }

    /// Run one bounded matching pass over a pair's book.
    ///
    /// Each fill settles both legs through the ledger before any book or
    /// store state changes, so an error leaves balances and book consistent
    /// with everything already executed.
    pub fn match_pair(
        &mut self,
        pair: &Pair,
        book: &mut Book,
        store: &mut OrderStore,
        ledger: &mut Ledger,
        max_levels: u32,
        now: u64,
    ) -> Result<MatchOutcome, MatchError> {
        let mut outcome = MatchOutcome::default();

        loop {
            if outcome.levels_exhausted >= max_levels {
                break;
            }

            // Lazy expiry: an expired head is cancelled and refunded, then
            // the pass re-examines the book.
            if self.expire_best(Side::Bid, pair, book, store, ledger, now, &mut outcome)? {
                continue;
            }
            if self.expire_best(Side::Ask, pair, book, store, ledger, now, &mut outcome)? {
                continue;
            }

            let Some((bid_price, bid_id, bid_remaining)) = book.bids.peek_best() else {
                break;
            };
            let Some((ask_price, ask_id, ask_remaining)) = book.asks.peek_best() else {
                break;
            };
            if !crosses(bid_price, ask_price) {
                break;
            }

            let bid = store
                .get(&bid_id)
                .ok_or(MatchError::MissingOrder { order_id: bid_id })?;
            let (bid_ts, buyer) = (bid.timestamp, bid.trader);
            debug_assert_eq!(bid.amount, bid_remaining, "bid head out of sync with store");
            let ask = store
                .get(&ask_id)
                .ok_or(MatchError::MissingOrder { order_id: ask_id })?;
            let (ask_ts, seller) = (ask.timestamp, ask.trader);
            debug_assert_eq!(ask.amount, ask_remaining, "ask head out of sync with store");

            // The order that rested first is the maker; its price executes.
            let (maker_price, maker_order_id) = if bid_ts <= ask_ts {
                (bid_price, bid_id)
            } else {
                (ask_price, ask_id)
            };

            let fill_amount = bid_remaining.min(ask_remaining);
            let quote_amount = fill_amount
                .checked_mul_price(maker_price)
                .ok_or(MatchError::Overflow)?;

            ledger.settle(buyer, seller, &pair.base, &pair.quote, fill_amount, quote_amount)?;

            // The buyer escrowed at their own limit price; when the maker's
            // price is better, the difference goes straight back.
            let escrowed = fill_amount
                .checked_mul_price(bid_price)
                .ok_or(MatchError::Overflow)?;
            let improvement = escrowed.checked_sub(quote_amount).ok_or(MatchError::Overflow)?;
            ledger.release(buyer, &pair.quote, improvement)?;

            store.reduce(&bid_id, fill_amount)?;
            store.reduce(&ask_id, fill_amount)?;
            if book.bids.reduce_best(fill_amount) {
                outcome.levels_exhausted += 1;
            }
            if book.asks.reduce_best(fill_amount) {
                outcome.levels_exhausted += 1;
            }

            let sequence = self.next_sequence;
            self.next_sequence += 1;
            outcome.fills.push(Fill::new(
                sequence,
                pair.pair_id,
                bid_id,
                ask_id,
                maker_order_id,
                maker_price,
                fill_amount,
                quote_amount,
            ));
        }

        Ok(outcome)
    }

    /// Cancel and refund the best order on one side if its expiry passed.
    ///
    /// Returns true when an order was expired, so the caller re-reads the
    /// book heads.
    #[allow(clippy::too_many_arguments)]
    fn expire_best(
        &self,
        side: Side,
        pair: &Pair,
        book: &mut Book,
        store: &mut OrderStore,
        ledger: &mut Ledger,
        now: u64,
        outcome: &mut MatchOutcome,
    ) -> Result<bool, MatchError> {
        let Some((price, order_id, _)) = book.side(side).peek_best() else {
            return Ok(false);
        };
        let order = store
            .get(&order_id)
            .ok_or(MatchError::MissingOrder { order_id })?;
        if !order.is_expired(now) {
            return Ok(false);
        }
        let trader = order.trader;

        let remaining = store.expire(&order_id)?;
        book.side_mut(side).remove(price, &order_id);

        let (asset, refund) = match side {
            Side::Bid => {
                let quote_escrow = remaining
                    .checked_mul_price(price)
                    .ok_or(MatchError::Overflow)?;
                (&pair.quote, quote_escrow)
            }
            Side::Ask => (&pair.base, remaining),
        };
        ledger.release(trader, asset, refund)?;

        outcome.expired.push(order_id);
        Ok(true)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}
