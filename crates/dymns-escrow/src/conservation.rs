//! Escrow conservation invariant checker.
//!
//! ```text
//! ∀ denom: module_balance(denom) == Σ offer_price of open orders in denom
//! ```
//!
//! The expected side is rebuilt from the open orders; the actual side is what
//! the bank says the module account holds.

use std::collections::{BTreeMap, BTreeSet};

use dymns_types::{DymnsError, Money, Result};
use rust_decimal::Decimal;

/// Expected escrow per denomination, accumulated from open orders.
#[derive(Debug, Clone, Default)]
pub struct EscrowConservation {
    expected: BTreeMap<String, Decimal>,
    orders: usize,
}

impl EscrowConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one open order's escrow.
    pub fn record_open_order(&mut self, offer_price: &Money) {
        *self
            .expected
            .entry(offer_price.denom.clone())
            .or_insert(Decimal::ZERO) += offer_price.amount;
        self.orders += 1;
    }

    #[must_use]
    pub fn expected(&self, denom: &str) -> Decimal {
        self.expected.get(denom).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders
    }

    /// Verify one denomination.
    ///
    /// # Errors
    /// Returns [`DymnsError::EscrowInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, denom: &str, actual: Decimal) -> Result<()> {
        let expected = self.expected(denom);
        if actual != expected {
            return Err(DymnsError::EscrowInvariantViolation {
                reason: format!(
                    "denom {denom}: module holds {actual} but {} open orders escrow {expected}",
                    self.orders
                ),
            });
        }
        Ok(())
    }

    /// Verify every denomination that is either expected or actually held.
    ///
    /// # Errors
    /// Returns the first [`DymnsError::EscrowInvariantViolation`] found, in
    /// denom order.
    pub fn verify_all(&self, held: &[Money]) -> Result<()> {
        let actual: BTreeMap<&str, Decimal> =
            held.iter().map(|m| (m.denom.as_str(), m.amount)).collect();
        let denoms: BTreeSet<&str> = actual
            .keys()
            .copied()
            .chain(self.expected.keys().map(String::as_str))
            .collect();
        for denom in denoms {
            self.verify(denom, actual.get(denom).copied().unwrap_or(Decimal::ZERO))?;
        }
        Ok(())
    }
}
