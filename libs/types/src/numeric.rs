//! Fixed-point numeric types for prices and amounts
//!
//! Both newtypes wrap `rust_decimal::Decimal`: a scaled integer
//! (96-bit mantissa plus decimal exponent), so all arithmetic is exact and
//! deterministic. No floating point anywhere in the core.
//!
//! A `Price` is always expressed in quote-asset units per one whole unit of
//! base asset; an `Amount` is a quantity of a single asset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A limit or execution price (quote units per whole base unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Wrap a raw decimal value
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create from an integer number of quote units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, e.g. "1.01"
    pub fn from_str(s: &str) -> Option<Self> {
        s.parse::<Decimal>().ok().map(Self)
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Check that this price is an exact multiple of a tick size.
    ///
    /// The tick must itself be positive; a non-multiple price is rejected by
    /// order validation.
    pub fn is_tick_multiple(&self, tick: Price) -> bool {
        tick.is_positive() && (self.0 % tick.0) == Decimal::ZERO
    }

    /// Difference `self - other`, `None` if it would go negative
    pub fn checked_sub(&self, other: Price) -> Option<Price> {
        if self.0 < other.0 {
            return None;
        }
        Some(Self(self.0 - other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative quantity of one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Wrap a non-negative decimal, `None` if negative
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value < Decimal::ZERO {
            return None;
        }
        Some(Self(value))
    }

    /// Create from an integer number of units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, e.g. "0.5"
    pub fn from_str(s: &str) -> Option<Self> {
        s.parse::<Decimal>().ok().and_then(Self::try_new)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checked addition, `None` on mantissa overflow
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction, `None` if the result would be negative
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        if self.0 < other.0 {
            return None;
        }
        Some(Self(self.0 - other.0))
    }

    /// Value of this base amount at the given price, in quote units.
    ///
    /// `None` on mantissa overflow.
    pub fn checked_mul_price(&self, price: Price) -> Option<Amount> {
        self.0.checked_mul(price.as_decimal()).and_then(|v| Self::try_new(v))
    }

    /// Minimum of two amounts
    pub fn min(self, other: Amount) -> Amount {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

// Plain operators for pre-validated arithmetic (tests, running totals).
// Fallible paths go through the checked_* methods.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        assert!(self.0 >= rhs.0, "Amount subtraction underflow");
        Amount(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
