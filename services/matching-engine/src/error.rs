//! Order validation and matching error types

use ledger::LedgerError;
use thiserror::Error;
use types::ids::OrderId;

/// Errors from order validation and lifecycle operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Price {price} is not positive or not a multiple of tick {tick}")]
    InvalidPrice { price: String, tick: String },

    #[error("Amount {amount} is below the pair minimum {minimum}")]
    BelowMinimum { amount: String, minimum: String },

    #[error("Expiry {expiry} is not in the future (now {now})")]
    InvalidExpiry { expiry: u64, now: u64 },

    #[error("Order {order_id} not found")]
    NotFound { order_id: OrderId },

    #[error("Order {order_id} is not owned by the caller")]
    NotOwner { order_id: OrderId },

    #[error("Order {order_id} is already filled or cancelled")]
    AlreadyTerminal { order_id: OrderId },
}

/// Errors from a matching pass
///
/// Any of these indicates a broken internal invariant or exhausted numeric
/// range, not a rejected user request; a matching pass either applies a fill
/// completely or not at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Order {order_id} is in the book but missing from the store")]
    MissingOrder { order_id: OrderId },

    #[error("Arithmetic overflow computing fill value")]
    Overflow,
}
