//! Match records emitted by the engine
//!
//! A fill is the atomic exchange produced by one matching step: `amount` of
//! base moved to the buyer and `quote_amount` of quote moved to the seller,
//! at the maker order's price.

use crate::ids::{FillId, OrderId, PairId};
use crate::numeric::{Amount, Price};
use serde::{Deserialize, Serialize};

/// A single executed match between a resting bid and a resting ask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub fill_id: FillId,
    /// Global monotonic sequence across all pairs
    pub sequence: u64,
    pub pair_id: PairId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    /// Which of the two orders was resting first (its price set the fill price)
    pub maker_order_id: OrderId,
    /// Execution price (always the maker's limit price)
    pub price: Price,
    /// Base quantity exchanged
    pub amount: Amount,
    /// Quote quantity exchanged (= amount x price, exact)
    pub quote_amount: Amount,
}

impl Fill {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        pair_id: PairId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        maker_order_id: OrderId,
        price: Price,
        amount: Amount,
        quote_amount: Amount,
    ) -> Self {
        Self {
            fill_id: FillId::new(),
            sequence,
            pair_id,
            buy_order_id,
            sell_order_id,
            maker_order_id,
            price,
            amount,
            quote_amount,
        }
    }
}
