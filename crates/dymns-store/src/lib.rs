//! # dymns-store
//!
//! KV plumbing shared by the DymNS keeper:
//!
//! - **Keys**: [`Namespace`] and typed key builders in [`keys`]
//! - **Codecs**: [`IndexCodec`] with JSON flavors for order IDs, Dym-Names and aliases
//! - **Reverse index**: [`ReverseIndex`], a key → sorted set of IDs map
//! - **Counters**: [`KeyCounter`], monotonic `u64` sequences for minting IDs
//! - **Records**: JSON load/save helpers for primary records
//! - **Buffer**: [`StoreBuffer`], the write buffer used as a transaction boundary

pub mod buffer;
pub mod codec;
pub mod counter;
pub mod keys;
pub mod record;
pub mod reverse_index;

pub use buffer::StoreBuffer;
pub use codec::{Aliases, DymNames, IndexCodec, OrderIds};
pub use counter::KeyCounter;
pub use keys::Namespace;
pub use reverse_index::ReverseIndex;
