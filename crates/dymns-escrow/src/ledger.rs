//! Escrow deposits and withdrawals for open orders.
//!
//! Every order's `offer_price` sits in the module account while the order is
//! open. The ledger is the only path funds take in or out of escrow.

use dymns_types::{Money, Result, Storage};
use rust_decimal::Decimal;

use crate::bank::BankKeeper;

/// Escrow operations on top of a [`BankKeeper`].
pub struct EscrowLedger<'b, B: ?Sized> {
    bank: &'b B,
}

impl<'b, B: BankKeeper + ?Sized> EscrowLedger<'b, B> {
    #[must_use]
    pub fn new(bank: &'b B) -> Self {
        Self { bank }
    }

    /// Move `amount` from `payer` into escrow.
    ///
    /// # Errors
    /// Returns [`dymns_types::DymnsError::InsufficientFunds`] if `payer` holds less.
    ///
    /// # Panics
    /// Panics if `amount` is not positive.
    pub fn deposit(&self, storage: &mut dyn Storage, payer: &str, amount: &Money) -> Result<()> {
        assert!(amount.is_positive(), "escrow deposit must be positive: {amount}");
        self.bank
            .send_coins_from_account_to_module(storage, payer, amount)?;
        tracing::info!(payer, amount = %amount, "escrow deposit");
        Ok(())
    }

    /// Release `amount` from escrow to `recipient`.
    ///
    /// # Errors
    /// Returns [`dymns_types::DymnsError::InsufficientFunds`] if escrow holds less.
    ///
    /// # Panics
    /// Panics if `amount` is not positive.
    pub fn withdraw(&self, storage: &mut dyn Storage, recipient: &str, amount: &Money) -> Result<()> {
        assert!(amount.is_positive(), "escrow withdrawal must be positive: {amount}");
        self.bank
            .send_coins_from_module_to_account(storage, recipient, amount)?;
        tracing::info!(recipient, amount = %amount, "escrow withdrawal");
        Ok(())
    }

    /// Amount of `denom` currently held in escrow.
    pub fn held(&self, storage: &dyn Storage, denom: &str) -> Result<Decimal> {
        self.bank.module_balance(storage, denom)
    }

    /// Every denomination held in escrow.
    pub fn held_all(&self, storage: &dyn Storage) -> Result<Vec<Money>> {
        self.bank.all_balances(storage, self.bank.module_address())
    }
}
