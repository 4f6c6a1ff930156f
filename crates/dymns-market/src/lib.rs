//! # dymns-market
//!
//! The DymNS keeper: everything that reads or writes marketplace state.
//!
//! ## Layout
//!
//! ```text
//! Keeper::execute ──► StoreBuffer + EventLog (transaction boundary)
//!        │
//!        ├── negotiation   place / accept / cancel, both order kinds
//!        │      ├── orders         OrderRepository (ids, CRUD, events)
//!        │      ├── lookup         typed reverse indices + resolving lookups
//!        │      ├── transfer       ownership moves on match
//!        │      └── EscrowLedger   funds in and out of the module account
//!        ├── dym_name / alias / sell_order   asset repositories
//!        └── invariants    escrow conservation + index consistency
//! ```
//!
//! Every operation takes a [`Context`](dymns_types::Context). Wrap calls in
//! [`Keeper::execute`] to get all-or-nothing semantics: a failed operation
//! leaves the store, balances and emitted events exactly as they were.

pub mod alias;
pub mod dym_name;
pub mod invariants;
pub mod keeper;
pub mod lookup;
pub mod msg;
pub mod negotiation;
pub mod offer_to_buy;
pub mod orders;
pub mod rollapp;
pub mod sell_order;
pub mod transfer;

pub use invariants::InvariantReport;
pub use keeper::Keeper;
pub use msg::*;
pub use orders::OrderRepository;
pub use rollapp::{RollAppKeeper, StaticRollApps};
