//! # dymns-types
//!
//! Shared types, errors, and configuration for the **DymNS** name marketplace.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Assets**: [`AssetType`], [`DymName`], [`DymNameConfig`], [`RollApp`], [`SellOrder`]
//! - **Order model**: [`Order`], [`OrderKind`]
//! - **Money**: [`Money`]
//! - **Addresses**: [`AddressCodec`], [`HexAddressCodec`]
//! - **Configuration**: [`Params`], [`PriceParams`], [`ChainsParams`], [`MiscParams`]
//! - **Host services**: [`Storage`] + [`MemStorage`], [`EventSink`] + [`EventLog`], [`Context`]
//! - **Errors**: [`DymnsError`] with `DNS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod address;
pub mod asset;
pub mod config;
pub mod constants;
pub mod context;
pub mod dym_name;
pub mod error;
pub mod event;
pub mod money;
pub mod order;
pub mod rollapp;
pub mod sell_order;
pub mod storage;

// Re-export all primary types at crate root for ergonomic imports:
//   use dymns_types::{Order, OrderKind, Money, DymName, ...};

pub use address::*;
pub use asset::*;
pub use config::*;
pub use context::*;
pub use dym_name::*;
pub use error::*;
pub use event::*;
pub use money::*;
pub use order::*;
pub use rollapp::*;
pub use sell_order::*;
pub use storage::*;

// Constants are accessed via `dymns_types::constants::FOO`
// (not re-exported to avoid name collisions).
