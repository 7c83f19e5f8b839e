//! Monetary amount value object.
//!
//! All monetary results in the engine (prices, discounts, commissions) are
//! rounded to 2 decimal places with midpoint-away-from-zero rounding. The
//! rounding happens on construction, so arithmetic over `Money` values stays
//! at 2 decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::ValidationError;

/// A monetary amount with 2-decimal-place precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a Money value, rounding to 2 decimal places.
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Creates a Money value, rejecting negative amounts.
    pub fn try_new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::negative("amount", amount));
        }
        Ok(Self::new(amount))
    }

    /// Returns the inner decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the given percentage of this amount (rate on a 0-100 scale).
    pub fn percent(&self, rate: Decimal) -> Self {
        Self::new(self.0 * rate / Decimal::ONE_HUNDRED)
    }

    /// Returns the smaller of two amounts.
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Scale-insensitive: 50 and 50.00 render identically, whatever the
        // source of the value.
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}
