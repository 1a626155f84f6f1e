//! Ledger-specific error types

use thiserror::Error;

/// Errors surfaced by balance operations
///
/// Every failure is a rejected operation; a failing precondition leaves no
/// balance changed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: String,
        available: String,
    },

    #[error("Insufficient escrow for {asset}: required {required}, locked {locked}")]
    InsufficientLocked {
        asset: String,
        required: String,
        locked: String,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}
