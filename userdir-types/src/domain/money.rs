//! Fixed-point monetary value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Fixed-point money representation.
///
/// The amount is stored in the smallest currency unit (cents) to avoid
/// floating-point rounding drift. Balances are never negative; construction
/// and arithmetic enforce that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new Money value.
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    /// Creates a zero-value Money.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in the smallest currency unit.
    pub fn amount(&self) -> i64 {
        self.0
    }

    /// Saturating addition; balances cap at the representable maximum.
    pub fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Checked subtraction - returns error if the result would be negative.
    pub fn checked_sub(&self, other: Money) -> Result<Money, DomainError> {
        if self.0 < other.0 {
            return Err(DomainError::InsufficientFunds {
                available: self.0,
                requested: other.0,
            });
        }
        Ok(Money(self.0 - other.0))
    }

    /// Returns true if this Money is greater than or equal to the other.
    pub fn gte(&self, other: &Money) -> bool {
        self.0 >= other.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / 100;
        let minor = (self.0 % 100).abs();
        write!(f, "{}.{:02}", major, minor)
    }
}
