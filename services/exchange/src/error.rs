//! Facade error type

use ledger::LedgerError;
use matching_engine::{MatchError, OrderError};
use thiserror::Error;
use types::ids::PairId;

/// Every failure an exchange operation can surface
///
/// Ledger, order, and matching errors pass through unchanged; the variants
/// here cover pair listing and batch placement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Pair for {base}/{quote} already exists")]
    PairExists { base: String, quote: String },

    #[error("Pair {pair_id} not found")]
    PairNotFound { pair_id: PairId },

    #[error("Base and quote must be different assets")]
    IdenticalAssets,

    #[error("Tick size must be positive")]
    InvalidTick,

    #[error("Minimum order size must be positive")]
    InvalidMinSize,

    #[error("Batch entry {index} rejected: {reason}")]
    BatchValidationFailed { index: usize, reason: String },
}
