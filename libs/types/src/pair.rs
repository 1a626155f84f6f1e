//! Trading pair configuration
//!
//! A pair is immutable after creation; its live best bid/ask are owned by
//! the per-pair book, not stored here.

use crate::ids::{AssetId, PairId};
use crate::numeric::{Amount, Price};
use serde::{Deserialize, Serialize};

/// A registered trading pair
///
/// Prices on this pair must be positive exact multiples of `tick_size`;
/// order amounts must be at least `min_order_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub pair_id: PairId,
    pub base: AssetId,
    pub quote: AssetId,
    pub tick_size: Price,
    pub min_order_size: Amount,
}

impl Pair {
    pub fn new(
        pair_id: PairId,
        base: AssetId,
        quote: AssetId,
        tick_size: Price,
        min_order_size: Amount,
    ) -> Self {
        Self {
            pair_id,
            base,
            quote,
            tick_size,
            min_order_size,
        }
    }

    /// Check a candidate order price: positive and on the tick grid.
    pub fn price_is_valid(&self, price: Price) -> bool {
        price.is_positive() && price.is_tick_multiple(self.tick_size)
    }

    /// Check a candidate order amount against the pair minimum.
    pub fn amount_is_valid(&self, amount: Amount) -> bool {
        amount >= self.min_order_size
    }
}
