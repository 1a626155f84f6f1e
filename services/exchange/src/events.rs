//! Exchange events
//!
//! Events are immutable records appended by facade operations and drained by
//! whoever sits above (a gateway, a test harness). One operation may append
//! several events: a matching pass appends one `TradeExecuted` per fill.

use serde::{Deserialize, Serialize};
use types::ids::{AssetId, OrderId, PairId, TraderId};
use types::numeric::{Amount, Price};
use types::order::{CancelReason, Side};

/// New pair listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCreated {
    pub pair_id: PairId,
    pub base: AssetId,
    pub quote: AssetId,
    pub tick_size: Price,
    pub min_order_size: Amount,
}

/// Funds credited to a trader's available balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposited {
    pub trader: TraderId,
    pub asset: AssetId,
    pub amount: Amount,
}

/// Funds debited from a trader's available balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub trader: TraderId,
    pub asset: AssetId,
    pub amount: Amount,
}

/// Order accepted and resting (possibly already crossed, pending a match pass)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub trader: TraderId,
    pub pair_id: PairId,
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
}

/// Fill produced by a matching pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecuted {
    pub pair_id: PairId,
    pub sequence: u64,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub price: Price,
    pub amount: Amount,
    pub quote_amount: Amount,
}

/// Order left the book before filling completely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub reason: CancelReason,
    pub refund_amount: Amount,
}

/// Enum wrapper for all exchange events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    PairCreated(PairCreated),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    OrderPlaced(OrderPlaced),
    TradeExecuted(TradeExecuted),
    OrderCancelled(OrderCancelled),
}
