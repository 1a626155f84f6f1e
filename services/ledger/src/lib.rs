//! Custodial Balance Ledger
//!
//! Sole owner of all (trader, asset) balances. Everything above it — order
//! placement, cancellation, settlement — moves value exclusively through the
//! operations defined here.
//!
//! # Modules
//! - `ledger`: deposit, withdraw, lock, release, settle, balance queries
//! - `error`: ledger-specific error types
//!
//! # Key invariant
//! No value creation or destruction: the total of an asset only grows on
//! deposit and only shrinks on withdrawal; settlement transfers conserve it.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::Ledger;
