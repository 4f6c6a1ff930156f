//! # dymns-escrow
//!
//! Funds handling for the DymNS marketplace.
//!
//! - [`BankKeeper`]: the account-ledger interface the keeper depends on
//! - [`Bank`]: an in-memory ledger whose balances live in the KV store, so a
//!   discarded transaction discards its transfers too
//! - [`EscrowLedger`]: deposit/withdraw of order escrow into the module account
//! - [`EscrowConservation`]: module balance == Σ open order prices

pub mod bank;
pub mod conservation;
pub mod ledger;

pub use bank::{Bank, BankKeeper};
pub use conservation::EscrowConservation;
pub use ledger::EscrowLedger;
