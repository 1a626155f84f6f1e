//! Matching: crossing test and the bounded matcher

pub mod crossing;
pub mod matcher;

pub use crossing::crosses;
pub use matcher::{MatchOutcome, Matcher};
