//! End-to-end exchange scenarios
//!
//! Exercises the full facade: listing, funding, order entry, matching
//! passes, cancellation, and queries, checking balances after every step.

use exchange::{BatchEntry, Exchange, ExchangeError, ExchangeEvent};
use ledger::LedgerError;
use matching_engine::OrderError;
use types::ids::{AssetId, PairId, TraderId};
use types::numeric::{Amount, Price};
use types::order::{CancelReason, OrderStatus, Side};

fn btc() -> AssetId {
    AssetId::new("BTC")
}

fn usdt() -> AssetId {
    AssetId::new("USDT")
}

fn price(s: &str) -> Price {
    Price::from_str(s).unwrap()
}

fn amt(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

/// Exchange with one BTC/USDT pair (tick 0.01, min size 1) and two funded
/// traders: alice holds 1000 USDT, bob holds 100 BTC.
fn setup() -> (Exchange, PairId, TraderId, TraderId) {
    let mut exchange = Exchange::new();
    let pair_id = exchange
        .create_pair(btc(), usdt(), price("0.01"), amt("1"))
        .unwrap();

    let alice = TraderId::new();
    let bob = TraderId::new();
    exchange.deposit(alice, &usdt(), amt("1000")).unwrap();
    exchange.deposit(bob, &btc(), amt("100")).unwrap();

    (exchange, pair_id, alice, bob)
}

// ─── Pair listing ───

#[test]
fn duplicate_pair_rejected() {
    let (mut exchange, _, _, _) = setup();
    let result = exchange.create_pair(btc(), usdt(), price("0.01"), amt("1"));
    assert!(matches!(result, Err(ExchangeError::PairExists { .. })));

    // Also in the flipped orientation
    let result = exchange.create_pair(usdt(), btc(), price("0.01"), amt("1"));
    assert!(matches!(result, Err(ExchangeError::PairExists { .. })));
}

#[test]
fn pair_listing_parameters_validated() {
    let mut exchange = Exchange::new();
    assert_eq!(
        exchange.create_pair(btc(), usdt(), Price::from_u64(0), amt("1")),
        Err(ExchangeError::InvalidTick)
    );
    assert_eq!(
        exchange.create_pair(btc(), usdt(), price("0.01"), Amount::zero()),
        Err(ExchangeError::InvalidMinSize)
    );
    assert_eq!(
        exchange.create_pair(btc(), btc(), price("0.01"), amt("1")),
        Err(ExchangeError::IdenticalAssets)
    );
}

// ─── Funding ───

#[test]
fn deposit_then_withdraw() {
    let (mut exchange, _, alice, _) = setup();

    exchange.withdraw(alice, &usdt(), amt("400")).unwrap();
    assert_eq!(exchange.get_user_balance(&alice, &usdt()).available, amt("600"));

    let result = exchange.withdraw(alice, &usdt(), amt("601"));
    assert!(matches!(
        result,
        Err(ExchangeError::Ledger(LedgerError::InsufficientBalance { .. }))
    ));
}

// ─── Order entry ───

#[test]
fn off_tick_and_undersized_orders_rejected() {
    let (mut exchange, pair_id, alice, _) = setup();

    let result =
        exchange.place_limit_order(alice, pair_id, Side::Bid, price("1.005"), amt("10"), 0, 1);
    assert!(matches!(
        result,
        Err(ExchangeError::Order(OrderError::InvalidPrice { .. }))
    ));

    let result =
        exchange.place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("0.5"), 0, 1);
    assert!(matches!(
        result,
        Err(ExchangeError::Order(OrderError::BelowMinimum { .. }))
    ));
}

#[test]
fn unknown_pair_rejected() {
    let (mut exchange, _, alice, _) = setup();
    let result = exchange.place_limit_order(
        alice,
        PairId::from_u64(99),
        Side::Bid,
        price("1.00"),
        amt("10"),
        0,
        1,
    );
    assert!(matches!(result, Err(ExchangeError::PairNotFound { .. })));
}

#[test]
fn best_bid_and_ask_track_the_book() {
    let (mut exchange, pair_id, alice, bob) = setup();

    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), None);

    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("0.98"), amt("10"), 0, 1)
        .unwrap();
    let better = exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("0.99"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.02"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.01"), amt("10"), 0, 1)
        .unwrap();

    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), Some(price("0.99")));
    assert_eq!(exchange.get_best_ask(pair_id).unwrap(), Some(price("1.01")));

    // Cancelling the best bid promotes the next level
    exchange.cancel_order(alice, better).unwrap();
    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), Some(price("0.98")));
}

// ─── Cancellation ───

#[test]
fn cancel_refunds_exact_escrow() {
    let (mut exchange, pair_id, alice, _) = setup();

    let order_id = exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.02"), amt("10"), 0, 1)
        .unwrap();
    assert_eq!(exchange.get_user_balance(&alice, &usdt()).locked, amt("10.20"));

    let refund = exchange.cancel_order(alice, order_id).unwrap();

    assert_eq!(refund, amt("10.20"));
    let balance = exchange.get_user_balance(&alice, &usdt());
    assert_eq!(balance.available, amt("1000"));
    assert!(balance.locked.is_zero());
    assert_eq!(
        exchange.get_order(&order_id).unwrap().status,
        OrderStatus::Cancelled(CancelReason::UserRequested)
    );
}

#[test]
fn cancel_by_non_owner_rejected() {
    let (mut exchange, pair_id, alice, bob) = setup();
    let order_id = exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("10"), 0, 1)
        .unwrap();

    let result = exchange.cancel_order(bob, order_id);

    assert!(matches!(
        result,
        Err(ExchangeError::Order(OrderError::NotOwner { .. }))
    ));
    assert!(exchange.get_order(&order_id).unwrap().is_active());
}

#[test]
fn cancel_after_fill_rejected() {
    let (mut exchange, pair_id, alice, bob) = setup();
    let bid = exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("10"), 0, 1)
        .unwrap();
    exchange.match_orders(pair_id, 10, 1).unwrap();

    let result = exchange.cancel_order(alice, bid);
    assert!(matches!(
        result,
        Err(ExchangeError::Order(OrderError::AlreadyTerminal { .. }))
    ));
}

// ─── Matching ───

#[test]
fn crossing_orders_match_and_settle() {
    let (mut exchange, pair_id, alice, bob) = setup();

    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("10"), 0, 1)
        .unwrap();

    let fills = exchange.match_orders(pair_id, 10, 1).unwrap();
    assert_eq!(fills, 1);

    // Alice paid 10 USDT for 10 BTC; bob the reverse
    assert_eq!(exchange.get_user_balance(&alice, &btc()).available, amt("10"));
    assert_eq!(exchange.get_user_balance(&alice, &usdt()).available, amt("990"));
    assert_eq!(exchange.get_user_balance(&bob, &btc()).available, amt("90"));
    assert_eq!(exchange.get_user_balance(&bob, &usdt()).available, amt("10"));

    // Matched-out funds are withdrawable
    exchange.withdraw(alice, &btc(), amt("10")).unwrap();
}

#[test]
fn partial_fill_leaves_remainder_active() {
    let (mut exchange, pair_id, alice, bob) = setup();

    let bid = exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    exchange.match_orders(pair_id, 10, 1).unwrap();

    let order = exchange.get_order(&bid).unwrap();
    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.amount, amt("5"));
    assert_eq!(order.filled_amount(), amt("5"));

    // Remaining escrow covers exactly the open remainder
    assert_eq!(exchange.get_user_balance(&alice, &usdt()).locked, amt("5.00"));
    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), Some(price("1.00")));
}

#[test]
fn taker_gets_price_improvement() {
    let (mut exchange, pair_id, alice, bob) = setup();

    // Bob's ask rests first at 1.00; alice crosses at 1.05
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.05"), amt("10"), 0, 1)
        .unwrap();
    exchange.match_orders(pair_id, 10, 1).unwrap();

    // Trade executed at 1.00: alice escrowed 10.50, spent 10.00
    let balance = exchange.get_user_balance(&alice, &usdt());
    assert_eq!(balance.available, amt("989.50") + amt("0.50"));
    assert!(balance.locked.is_zero());
    assert_eq!(exchange.get_user_balance(&bob, &usdt()).available, amt("10.00"));
}

#[test]
fn earlier_order_at_same_price_fills_first() {
    let (mut exchange, pair_id, alice, bob) = setup();
    let carol = TraderId::new();
    exchange.deposit(carol, &btc(), amt("100")).unwrap();

    let first = exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    let second = exchange
        .place_limit_order(carol, pair_id, Side::Ask, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    exchange.match_orders(pair_id, 10, 1).unwrap();

    assert_eq!(exchange.get_order(&first).unwrap().status, OrderStatus::Filled);
    assert!(exchange.get_order(&second).unwrap().is_active());
}

#[test]
fn bounded_pass_drains_book_incrementally() {
    let (mut exchange, pair_id, alice, bob) = setup();

    for p in ["1.00", "1.01", "1.02"] {
        exchange
            .place_limit_order(bob, pair_id, Side::Ask, price(p), amt("5"), 0, 1)
            .unwrap();
    }
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.02"), amt("15"), 0, 1)
        .unwrap();

    // One level per pass
    assert_eq!(exchange.match_orders(pair_id, 1, 1).unwrap(), 1);
    assert_eq!(exchange.get_best_ask(pair_id).unwrap(), Some(price("1.01")));
    assert_eq!(exchange.match_orders(pair_id, 1, 1).unwrap(), 1);
    assert_eq!(exchange.match_orders(pair_id, 1, 1).unwrap(), 1);

    assert_eq!(exchange.get_best_ask(pair_id).unwrap(), None);
    assert_eq!(exchange.get_user_balance(&alice, &btc()).available, amt("15"));
}

#[test]
fn expired_order_skipped_and_refunded_during_match() {
    let (mut exchange, pair_id, alice, bob) = setup();

    let expiring = exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("5"), 50, 1)
        .unwrap();
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("5"), 0, 1)
        .unwrap();

    let fills = exchange.match_orders(pair_id, 10, 100).unwrap();

    assert_eq!(fills, 0);
    assert_eq!(
        exchange.get_order(&expiring).unwrap().status,
        OrderStatus::Cancelled(CancelReason::Expired)
    );
    assert_eq!(exchange.get_user_balance(&bob, &btc()).available, amt("100"));
    // Alice's bid still rests
    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), Some(price("1.00")));
}

// ─── Depth ───

#[test]
fn depth_snapshot_aggregates_levels() {
    let (mut exchange, pair_id, alice, bob) = setup();

    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("0.99"), amt("10"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("0.99"), amt("5"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("0.98"), amt("7"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.01"), amt("3"), 0, 1)
        .unwrap();

    let depth = exchange.get_order_book_depth(pair_id, 10).unwrap();

    assert_eq!(depth.bids.len(), 2);
    assert_eq!(depth.bids[0].price, price("0.99"));
    assert_eq!(depth.bids[0].total_amount, amt("15"));
    assert_eq!(depth.bids[0].order_count, 2);
    assert_eq!(depth.bids[1].price, price("0.98"));
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.asks[0].total_amount, amt("3"));

    // Truncation keeps the most aggressive levels
    let top = exchange.get_order_book_depth(pair_id, 1).unwrap();
    assert_eq!(top.bids.len(), 1);
    assert_eq!(top.bids[0].price, price("0.99"));
}

// ─── Batch placement ───

#[test]
fn batch_places_all_orders() {
    let (mut exchange, pair_id, alice, _) = setup();

    let entries = [
        BatchEntry {
            side: Side::Bid,
            price: price("0.99"),
            amount: amt("10"),
            expiry: 0,
        },
        BatchEntry {
            side: Side::Bid,
            price: price("0.98"),
            amount: amt("20"),
            expiry: 0,
        },
    ];
    let ids = exchange.batch_place_orders(alice, pair_id, &entries, 1).unwrap();

    assert_eq!(ids.len(), 2);
    // 9.90 + 19.60 escrowed
    assert_eq!(exchange.get_user_balance(&alice, &usdt()).locked, amt("29.50"));
    let depth = exchange.get_order_book_depth(pair_id, 10).unwrap();
    assert_eq!(depth.bids.len(), 2);
}

#[test]
fn batch_rejects_all_on_one_bad_entry() {
    let (mut exchange, pair_id, alice, _) = setup();

    let entries = [
        BatchEntry {
            side: Side::Bid,
            price: price("0.99"),
            amount: amt("10"),
            expiry: 0,
        },
        BatchEntry {
            side: Side::Bid,
            price: price("0.995"), // off tick
            amount: amt("10"),
            expiry: 0,
        },
    ];
    let result = exchange.batch_place_orders(alice, pair_id, &entries, 1);

    assert!(matches!(
        result,
        Err(ExchangeError::BatchValidationFailed { index: 1, .. })
    ));
    // Nothing placed, nothing escrowed
    assert!(exchange.get_user_balance(&alice, &usdt()).locked.is_zero());
    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), None);
}

#[test]
fn batch_rejects_entry_whose_escrow_overflows() {
    let (mut exchange, pair_id, alice, _) = setup();

    // amount x price exceeds the decimal mantissa range
    let entries = [BatchEntry {
        side: Side::Bid,
        price: price("1000000000000000"),
        amount: amt("1000000000000000"),
        expiry: 0,
    }];
    let result = exchange.batch_place_orders(alice, pair_id, &entries, 1);

    assert!(matches!(
        result,
        Err(ExchangeError::BatchValidationFailed { index: 0, .. })
    ));
    assert!(exchange.get_user_balance(&alice, &usdt()).locked.is_zero());
}

#[test]
fn batch_rejects_all_when_aggregate_escrow_exceeds_funds() {
    let (mut exchange, pair_id, alice, _) = setup();

    // Each entry alone fits in 1000 USDT; together they do not
    let entries = [
        BatchEntry {
            side: Side::Bid,
            price: price("1.00"),
            amount: amt("600"),
            expiry: 0,
        },
        BatchEntry {
            side: Side::Bid,
            price: price("1.00"),
            amount: amt("600"),
            expiry: 0,
        },
    ];
    let result = exchange.batch_place_orders(alice, pair_id, &entries, 1);

    assert!(matches!(
        result,
        Err(ExchangeError::Ledger(LedgerError::InsufficientBalance { .. }))
    ));
    assert!(exchange.get_user_balance(&alice, &usdt()).locked.is_zero());
    assert_eq!(exchange.get_best_bid(pair_id).unwrap(), None);
}

// ─── Events ───

#[test]
fn lifecycle_emits_events_in_order() {
    let (mut exchange, pair_id, alice, bob) = setup();
    exchange.drain_events();

    exchange
        .place_limit_order(alice, pair_id, Side::Bid, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    exchange
        .place_limit_order(bob, pair_id, Side::Ask, price("1.00"), amt("5"), 0, 1)
        .unwrap();
    exchange.match_orders(pair_id, 10, 1).unwrap();

    let events = exchange.drain_events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ExchangeEvent::OrderPlaced(_)));
    assert!(matches!(events[1], ExchangeEvent::OrderPlaced(_)));
    match &events[2] {
        ExchangeEvent::TradeExecuted(trade) => {
            assert_eq!(trade.amount, amt("5"));
            assert_eq!(trade.price, price("1.00"));
        }
        other => panic!("expected TradeExecuted, got {other:?}"),
    }
}
