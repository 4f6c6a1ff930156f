//! Denominated amounts.
//!
//! Every price in the marketplace is a `(denom, amount)` pair. Arithmetic is
//! only defined between amounts of the same denomination.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub denom: String,
    pub amount: Decimal,
}

impl Money {
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: Decimal) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Zero of the given denomination.
    #[must_use]
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, Decimal::ZERO)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    #[must_use]
    pub fn same_denom(&self, other: &Self) -> bool {
        self.denom == other.denom
    }

    /// Well-formed: non-empty denom and non-negative amount.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.denom.is_empty() && self.amount >= Decimal::ZERO
    }

    /// `self - other`, or `None` when the denominations differ or the result
    /// would be negative.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if !self.same_denom(other) || self.amount < other.amount {
            return None;
        }
        Some(Self::new(self.denom.clone(), self.amount - other.amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
