//! Order store: records, identity, and lifecycle
//!
//! The store owns every order ever accepted and assigns two monotonic
//! counters: the order id (starting at 1) and a logical arrival timestamp
//! used for FIFO tie-breaks. Orders are never deleted; terminal orders stay
//! queryable.

use std::collections::HashMap;
use types::ids::{OrderId, TraderId};
use types::numeric::{Amount, Price};
use types::order::{CancelReason, Order, Side};
use types::pair::Pair;

use crate::error::OrderError;

/// Append-only store of all orders across all pairs
#[derive(Debug)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
    /// Next order id to assign; ids start at 1 so 0 is never a valid order
    next_order_id: u64,
    /// Logical arrival clock, bumped once per accepted order
    next_timestamp: u64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            next_order_id: 1,
            next_timestamp: 1,
        }
    }

    /// Validate price and amount against a pair's listing parameters.
    ///
    /// Checked here rather than at creation only, so batch placement can
    /// reject a whole batch before creating anything.
    pub fn validate(pair: &Pair, price: Price, amount: Amount) -> Result<(), OrderError> {
        if !pair.price_is_valid(price) {
            return Err(OrderError::InvalidPrice {
                price: price.to_string(),
                tick: pair.tick_size.to_string(),
            });
        }
        if !pair.amount_is_valid(amount) {
            return Err(OrderError::BelowMinimum {
                amount: amount.to_string(),
                minimum: pair.min_order_size.to_string(),
            });
        }
        Ok(())
    }

    /// Validate and record a new active order.
    ///
    /// `expiry` of 0 means the order never expires; a non-zero expiry must be
    /// strictly after `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        trader: TraderId,
        pair: &Pair,
        side: Side,
        price: Price,
        amount: Amount,
        expiry: u64,
        now: u64,
    ) -> Result<OrderId, OrderError> {
        Self::validate(pair, price, amount)?;
        if expiry != 0 && expiry <= now {
            return Err(OrderError::InvalidExpiry { expiry, now });
        }

        let order_id = OrderId::from_u64(self.next_order_id);
        self.next_order_id += 1;
        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;

        let order = Order::new(order_id, trader, pair.pair_id, side, price, amount, timestamp, expiry);
        self.orders.insert(order_id, order);
        Ok(order_id)
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Apply a fill to an active order. Callers guarantee the order exists,
    /// is active, and the fill does not exceed its remainder.
    pub fn reduce(&mut self, order_id: &OrderId, fill_amount: Amount) -> Result<(), OrderError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or(OrderError::NotFound { order_id: *order_id })?;
        order.fill(fill_amount);
        Ok(())
    }

    /// Cancel an order on behalf of its owner.
    ///
    /// Returns the remaining amount at cancellation time so the caller can
    /// compute the escrow refund.
    pub fn cancel(&mut self, order_id: &OrderId, caller: &TraderId) -> Result<Amount, OrderError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or(OrderError::NotFound { order_id: *order_id })?;
        if order.trader != *caller {
            return Err(OrderError::NotOwner { order_id: *order_id });
        }
        if order.status.is_terminal() {
            return Err(OrderError::AlreadyTerminal { order_id: *order_id });
        }

        let remaining = order.amount;
        order.cancel(CancelReason::UserRequested);
        Ok(remaining)
    }

    /// Cancel an active order that passed its expiry. Same refund contract
    /// as `cancel`, without the ownership check.
    pub fn expire(&mut self, order_id: &OrderId) -> Result<Amount, OrderError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or(OrderError::NotFound { order_id: *order_id })?;
        if order.status.is_terminal() {
            return Err(OrderError::AlreadyTerminal { order_id: *order_id });
        }

        let remaining = order.amount;
        order.cancel(CancelReason::Expired);
        Ok(remaining)
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{AssetId, PairId};
    use types::order::OrderStatus;

    fn test_pair() -> Pair {
        Pair::new(
            PairId::from_u64(1),
            AssetId::new("BTC"),
            AssetId::new("USDT"),
            Price::from_str("0.01").unwrap(),
            Amount::from_u64(1),
        )
    }

    fn place(store: &mut OrderStore, trader: TraderId, amount: u64) -> OrderId {
        store
            .create(
                trader,
                &test_pair(),
                Side::Bid,
                Price::from_str("1.00").unwrap(),
                Amount::from_u64(amount),
                0,
                1,
            )
            .unwrap()
    }

    #[test]
    fn test_ids_and_timestamps_are_sequential() {
        let mut store = OrderStore::new();
        let trader = TraderId::new();

        let first = place(&mut store, trader, 5);
        let second = place(&mut store, trader, 5);

        assert_eq!(first.as_u64(), 1);
        assert_eq!(second.as_u64(), 2);
        assert!(store.get(&first).unwrap().timestamp < store.get(&second).unwrap().timestamp);
    }

    #[test]
    fn test_create_rejects_off_tick_price() {
        let mut store = OrderStore::new();
        let result = store.create(
            TraderId::new(),
            &test_pair(),
            Side::Bid,
            Price::from_str("1.005").unwrap(),
            Amount::from_u64(5),
            0,
            1,
        );
        assert!(matches!(result, Err(OrderError::InvalidPrice { .. })));
    }

    #[test]
    fn test_create_rejects_zero_price() {
        let mut store = OrderStore::new();
        let result = store.create(
            TraderId::new(),
            &test_pair(),
            Side::Ask,
            Price::from_u64(0),
            Amount::from_u64(5),
            0,
            1,
        );
        assert!(matches!(result, Err(OrderError::InvalidPrice { .. })));
    }

    #[test]
    fn test_create_rejects_below_minimum() {
        let mut store = OrderStore::new();
        let result = store.create(
            TraderId::new(),
            &test_pair(),
            Side::Bid,
            Price::from_str("1.00").unwrap(),
            Amount::from_str("0.5").unwrap(),
            0,
            1,
        );
        assert!(matches!(result, Err(OrderError::BelowMinimum { .. })));
    }

    #[test]
    fn test_create_rejects_past_expiry() {
        let mut store = OrderStore::new();
        let result = store.create(
            TraderId::new(),
            &test_pair(),
            Side::Bid,
            Price::from_str("1.00").unwrap(),
            Amount::from_u64(5),
            100,
            100,
        );
        assert_eq!(result, Err(OrderError::InvalidExpiry { expiry: 100, now: 100 }));
    }

    #[test]
    fn test_cancel_returns_remaining() {
        let mut store = OrderStore::new();
        let trader = TraderId::new();
        let id = place(&mut store, trader, 10);
        store.reduce(&id, Amount::from_u64(4)).unwrap();

        let remaining = store.cancel(&id, &trader).unwrap();

        assert_eq!(remaining, Amount::from_u64(6));
        assert_eq!(
            store.get(&id).unwrap().status,
            OrderStatus::Cancelled(CancelReason::UserRequested)
        );
    }

    #[test]
    fn test_cancel_not_owner() {
        let mut store = OrderStore::new();
        let id = place(&mut store, TraderId::new(), 10);

        let result = store.cancel(&id, &TraderId::new());
        assert!(matches!(result, Err(OrderError::NotOwner { .. })));
        assert!(store.get(&id).unwrap().is_active());
    }

    #[test]
    fn test_cancel_terminal_rejected() {
        let mut store = OrderStore::new();
        let trader = TraderId::new();
        let id = place(&mut store, trader, 10);
        store.reduce(&id, Amount::from_u64(10)).unwrap();

        let result = store.cancel(&id, &trader);
        assert!(matches!(result, Err(OrderError::AlreadyTerminal { .. })));
    }

    #[test]
    fn test_cancel_unknown_order() {
        let mut store = OrderStore::new();
        let result = store.cancel(&OrderId::from_u64(99), &TraderId::new());
        assert!(matches!(result, Err(OrderError::NotFound { .. })));
    }

    #[test]
    fn test_expire_marks_expired_reason() {
        let mut store = OrderStore::new();
        let trader = TraderId::new();
        let id = store
            .create(
                trader,
                &test_pair(),
                Side::Ask,
                Price::from_str("1.00").unwrap(),
                Amount::from_u64(3),
                50,
                1,
            )
            .unwrap();

        let remaining = store.expire(&id).unwrap();

        assert_eq!(remaining, Amount::from_u64(3));
        assert_eq!(
            store.get(&id).unwrap().status,
            OrderStatus::Cancelled(CancelReason::Expired)
        );
    }

    #[test]
    fn test_terminal_orders_stay_queryable() {
        let mut store = OrderStore::new();
        let trader = TraderId::new();
        let id = place(&mut store, trader, 10);
        store.cancel(&id, &trader).unwrap();

        let order = store.get(&id).unwrap();
        assert_eq!(order.original_amount, Amount::from_u64(10));
    }
}
