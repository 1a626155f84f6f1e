//! Exchange Facade
//!
//! Single entry point tying the pair registry, the custodial ledger, the
//! order store, and the per-pair books together. Every external operation —
//! deposits, order entry, cancellation, matching passes, queries — goes
//! through [`Exchange`], which coordinates escrow and book updates so the
//! pieces can never disagree.
//!
//! # Modules
//! - `exchange`: the facade itself
//! - `registry`: pair listing and lookup
//! - `events`: emitted event records
//! - `error`: facade error type

pub mod error;
pub mod events;
pub mod exchange;
pub mod registry;

pub use error::ExchangeError;
pub use events::ExchangeEvent;
pub use exchange::{BatchEntry, DepthSnapshot, Exchange};
pub use registry::PairRegistry;
