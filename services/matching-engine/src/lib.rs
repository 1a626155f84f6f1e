//! Matching Engine
//!
//! Price-time priority matching over per-pair limit order books.
//!
//! **Key invariants:**
//! - Strict price-time priority: better price first, earlier arrival first
//!   within a price level
//! - Deterministic: same call sequence produces the same fills
//! - Fills execute at the maker's limit price; a buyer's over-escrow is
//!   refunded immediately
//! - Matching work per call is bounded by a caller-supplied level budget
//!
//! # Modules
//! - `store`: order records, id and arrival-sequence assignment, lifecycle
//! - `book`: per-pair bid/ask books over FIFO price levels
//! - `matching`: the crossing test and the bounded matcher
//! - `error`: order validation and matching error types

pub mod book;
pub mod error;
pub mod matching;
pub mod store;

pub use book::{Book, DepthLevel};
pub use error::{MatchError, OrderError};
pub use matching::{MatchOutcome, Matcher};
pub use store::OrderStore;
