//! Store key layout.
//!
//! Every key starts with one [`Namespace`] byte. Order keys then carry the
//! asset-type partition byte and the big-endian sequence number, so a prefix
//! scan lists Dym-Name orders before Alias orders, each in numeric order.

use dymns_types::{AssetType, OrderKind, ParsedOrderId};

/// First byte of every store key.
///
/// Discriminants must stay unique; the compiler rejects duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Namespace {
    DymName = 0x01,
    OwnerToDymNames = 0x02,
    ConfiguredAddressToDymNames = 0x03,
    FallbackAddressToDymNames = 0x04,
    SellOrder = 0x05,
    BuyOrder = 0x06,
    BuyerToBuyOrders = 0x07,
    DymNameToBuyOrders = 0x08,
    AliasToBuyOrders = 0x09,
    RollAppToAliases = 0x0A,
    AliasToRollApp = 0x0B,
    OrderCounter = 0x0C,
    OfferToBuy = 0x0D,
    BuyerToOffersToBuy = 0x0E,
    DymNameToOffersToBuy = 0x0F,
    Balance = 0x20,
}

impl Namespace {
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// The bare one-byte prefix, for scans over a whole namespace.
    #[must_use]
    pub fn prefix(self) -> Vec<u8> {
        vec![self.byte()]
    }

    /// `[namespace] ++ suffix`.
    #[must_use]
    pub fn key(self, suffix: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + suffix.len());
        key.push(self.byte());
        key.extend_from_slice(suffix);
        key
    }
}

/// Hex rendering of a key, for logs.
#[must_use]
pub fn display(key: &[u8]) -> String {
    hex::encode(key)
}

#[must_use]
pub fn dym_name(name: &str) -> Vec<u8> {
    Namespace::DymName.key(name.as_bytes())
}

#[must_use]
pub fn owner_to_dym_names(owner: &[u8]) -> Vec<u8> {
    Namespace::OwnerToDymNames.key(owner)
}

#[must_use]
pub fn configured_address_to_dym_names(address: &str) -> Vec<u8> {
    Namespace::ConfiguredAddressToDymNames.key(address.as_bytes())
}

#[must_use]
pub fn fallback_address_to_dym_names(address: &[u8]) -> Vec<u8> {
    Namespace::FallbackAddressToDymNames.key(address)
}

#[must_use]
pub fn sell_order(asset_type: AssetType, asset_id: &str) -> Vec<u8> {
    let mut key = Namespace::SellOrder.key(&[asset_type.store_byte()]);
    key.extend_from_slice(asset_id.as_bytes());
    key
}

/// Primary key of an order.
#[must_use]
pub fn order(kind: OrderKind, id: ParsedOrderId) -> Vec<u8> {
    match kind {
        OrderKind::BuyOrder => {
            let mut key = Namespace::BuyOrder.key(&[id.asset_type.store_byte()]);
            key.extend_from_slice(&id.sequence.to_be_bytes());
            key
        }
        OrderKind::OfferToBuy => Namespace::OfferToBuy.key(&id.sequence.to_be_bytes()),
    }
}

/// Scan prefix covering every order of `kind`.
#[must_use]
pub fn orders_prefix(kind: OrderKind) -> Vec<u8> {
    match kind {
        OrderKind::BuyOrder => Namespace::BuyOrder.prefix(),
        OrderKind::OfferToBuy => Namespace::OfferToBuy.prefix(),
    }
}

#[must_use]
pub fn buyer_to_orders(kind: OrderKind, buyer: &[u8]) -> Vec<u8> {
    match kind {
        OrderKind::BuyOrder => Namespace::BuyerToBuyOrders.key(buyer),
        OrderKind::OfferToBuy => Namespace::BuyerToOffersToBuy.key(buyer),
    }
}

/// Asset → orders. Offers-to-buy only exist for Dym-Names.
#[must_use]
pub fn asset_to_orders(kind: OrderKind, asset_type: AssetType, asset_id: &str) -> Vec<u8> {
    let ns = match (kind, asset_type) {
        (OrderKind::BuyOrder, AssetType::DymName) => Namespace::DymNameToBuyOrders,
        (OrderKind::BuyOrder, AssetType::Alias) => Namespace::AliasToBuyOrders,
        (OrderKind::OfferToBuy, _) => Namespace::DymNameToOffersToBuy,
    };
    ns.key(asset_id.as_bytes())
}

#[must_use]
pub fn order_counter(kind: OrderKind) -> Vec<u8> {
    let tag = match kind {
        OrderKind::BuyOrder => 1u8,
        OrderKind::OfferToBuy => 2u8,
    };
    Namespace::OrderCounter.key(&[tag])
}

#[must_use]
pub fn rollapp_to_aliases(rollapp_id: &str) -> Vec<u8> {
    Namespace::RollAppToAliases.key(rollapp_id.as_bytes())
}

#[must_use]
pub fn alias_to_rollapp(alias: &str) -> Vec<u8> {
    Namespace::AliasToRollApp.key(alias.as_bytes())
}

/// `[Balance] ++ address ++ 0x00 ++ denom`.
#[must_use]
pub fn balance(address: &str, denom: &str) -> Vec<u8> {
    let mut key = balances_of(address);
    key.extend_from_slice(denom.as_bytes());
    key
}

/// Scan prefix covering every balance of `address`.
#[must_use]
pub fn balances_of(address: &str) -> Vec<u8> {
    let mut key = Namespace::Balance.key(address.as_bytes());
    key.push(0);
    key
}
