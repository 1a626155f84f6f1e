//! Types library for the limit-order exchange
//!
//! This library provides all core type definitions shared by the ledger,
//! matching engine, and exchange facade, ensuring type safety and
//! deterministic behavior.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, PairId, TraderId, FillId, AssetId)
//! - `numeric`: Fixed-point decimal types (Price, Amount)
//! - `order`: Order lifecycle types
//! - `pair`: Trading pair configuration
//! - `balance`: Custodial balance primitives
//! - `fill`: Match records emitted by the engine

// Public modules
pub mod ids;
pub mod numeric;
pub mod order;
pub mod pair;
pub mod balance;
pub mod fill;
