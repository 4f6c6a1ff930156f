//! Typed reverse indices and the lookups built on them.
//!
//! Each `add_*` / `remove_*` helper validates its inputs before touching the
//! generic [`ReverseIndex`], so malformed addresses or ids never become keys.
//! The resolving lookups turn indexed ids back into records and quietly skip
//! stale entries: a missing record, or one whose buyer / owner / asset no
//! longer matches the key it was found under.

use dymns_escrow::BankKeeper;
use dymns_store::{keys, Aliases, DymNames, OrderIds, ReverseIndex};
use dymns_types::{
    constants, AddressCodec, AssetType, DymName, DymnsError, Order, OrderKind, Result, Storage,
    is_valid_dym_name, is_valid_rollapp_id,
};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

const ORDER_IDS: ReverseIndex<OrderIds> = ReverseIndex::new();
const DYM_NAMES: ReverseIndex<DymNames> = ReverseIndex::new();
const ALIASES: ReverseIndex<Aliases> = ReverseIndex::new();

fn check_name(name: &str) -> Result<()> {
    if is_valid_dym_name(name) {
        Ok(())
    } else {
        Err(DymnsError::InvalidAssetId {
            asset_type: AssetType::DymName,
            asset_id: name.to_string(),
        })
    }
}

fn check_asset(kind: OrderKind, asset_type: AssetType, asset_id: &str, order_id: Option<&str>) -> Result<()> {
    if kind == OrderKind::OfferToBuy && asset_type != AssetType::DymName {
        return Err(DymnsError::invalid("offers-to-buy only exist for Dym-Names"));
    }
    if !asset_type.is_valid_asset_id(asset_id) {
        return Err(DymnsError::InvalidAssetId {
            asset_type,
            asset_id: asset_id.to_string(),
        });
    }
    if let Some(order_id) = order_id {
        if kind.parse_id(order_id)?.asset_type != asset_type {
            return Err(DymnsError::InvalidOrderId(format!(
                "{order_id}: not a {asset_type} order"
            )));
        }
    }
    Ok(())
}

/// Configured addresses are matched case-insensitively and without
/// surrounding whitespace.
fn normalize_configured_address(address: &str) -> Result<String> {
    let normalized = address.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DymnsError::InvalidAddress(address.to_string()));
    }
    Ok(normalized)
}

fn check_fallback_address(address: &[u8]) -> Result<()> {
    if constants::ADDRESS_LENGTHS.contains(&address.len()) {
        Ok(())
    } else {
        Err(DymnsError::InvalidAddress(format!("0x{}", hex::encode(address))))
    }
}

fn check_rollapp_id(rollapp_id: &str) -> Result<()> {
    if is_valid_rollapp_id(rollapp_id) {
        Ok(())
    } else {
        Err(DymnsError::invalid(format!("invalid RollApp ID: {rollapp_id}")))
    }
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    // ------------------------------------------------------------------
    // buyer → orders
    // ------------------------------------------------------------------

    fn buyer_key(&self, kind: OrderKind, buyer: &str) -> Result<Vec<u8>> {
        Ok(keys::buyer_to_orders(kind, &self.codec().decode(buyer)?))
    }

    pub fn add_buyer_order_index(
        &self,
        storage: &mut dyn Storage,
        kind: OrderKind,
        buyer: &str,
        order_id: &str,
    ) -> Result<()> {
        kind.parse_id(order_id)?;
        ORDER_IDS.add(storage, &self.buyer_key(kind, buyer)?, order_id)
    }

    pub fn remove_buyer_order_index(
        &self,
        storage: &mut dyn Storage,
        kind: OrderKind,
        buyer: &str,
        order_id: &str,
    ) -> Result<()> {
        kind.parse_id(order_id)?;
        ORDER_IDS.remove(storage, &self.buyer_key(kind, buyer)?, order_id)
    }

    /// Raw ids indexed under `buyer`, stale ones included.
    pub fn order_ids_of_buyer(&self, storage: &dyn Storage, kind: OrderKind, buyer: &str) -> Result<Vec<String>> {
        ORDER_IDS.get(storage, &self.buyer_key(kind, buyer)?)
    }

    // ------------------------------------------------------------------
    // asset → orders
    // ------------------------------------------------------------------

    pub fn add_asset_order_index(
        &self,
        storage: &mut dyn Storage,
        kind: OrderKind,
        asset_type: AssetType,
        asset_id: &str,
        order_id: &str,
    ) -> Result<()> {
        check_asset(kind, asset_type, asset_id, Some(order_id))?;
        ORDER_IDS.add(storage, &keys::asset_to_orders(kind, asset_type, asset_id), order_id)
    }

    pub fn remove_asset_order_index(
        &self,
        storage: &mut dyn Storage,
        kind: OrderKind,
        asset_type: AssetType,
        asset_id: &str,
        order_id: &str,
    ) -> Result<()> {
        check_asset(kind, asset_type, asset_id, Some(order_id))?;
        ORDER_IDS.remove(storage, &keys::asset_to_orders(kind, asset_type, asset_id), order_id)
    }

    /// Raw ids indexed under the asset, stale ones included.
    pub fn order_ids_of_asset(
        &self,
        storage: &dyn Storage,
        kind: OrderKind,
        asset_type: AssetType,
        asset_id: &str,
    ) -> Result<Vec<String>> {
        check_asset(kind, asset_type, asset_id, None)?;
        ORDER_IDS.get(storage, &keys::asset_to_orders(kind, asset_type, asset_id))
    }

    // ------------------------------------------------------------------
    // owner / configured address / fallback address → Dym-Names
    // ------------------------------------------------------------------

    fn owner_key(&self, owner: &str) -> Result<Vec<u8>> {
        Ok(keys::owner_to_dym_names(&self.codec().decode(owner)?))
    }

    pub fn add_owner_index(&self, storage: &mut dyn Storage, owner: &str, name: &str) -> Result<()> {
        check_name(name)?;
        DYM_NAMES.add(storage, &self.owner_key(owner)?, name)
    }

    pub fn remove_owner_index(&self, storage: &mut dyn Storage, owner: &str, name: &str) -> Result<()> {
        check_name(name)?;
        DYM_NAMES.remove(storage, &self.owner_key(owner)?, name)
    }

    pub fn names_of_owner(&self, storage: &dyn Storage, owner: &str) -> Result<Vec<String>> {
        DYM_NAMES.get(storage, &self.owner_key(owner)?)
    }

    pub fn add_configured_address_index(&self, storage: &mut dyn Storage, address: &str, name: &str) -> Result<()> {
        check_name(name)?;
        let address = normalize_configured_address(address)?;
        DYM_NAMES.add(storage, &keys::configured_address_to_dym_names(&address), name)
    }

    pub fn remove_configured_address_index(&self, storage: &mut dyn Storage, address: &str, name: &str) -> Result<()> {
        check_name(name)?;
        let address = normalize_configured_address(address)?;
        DYM_NAMES.remove(storage, &keys::configured_address_to_dym_names(&address), name)
    }

    pub fn names_of_configured_address(&self, storage: &dyn Storage, address: &str) -> Result<Vec<String>> {
        let address = normalize_configured_address(address)?;
        DYM_NAMES.get(storage, &keys::configured_address_to_dym_names(&address))
    }

    pub fn add_fallback_address_index(&self, storage: &mut dyn Storage, address: &[u8], name: &str) -> Result<()> {
        check_name(name)?;
        check_fallback_address(address)?;
        DYM_NAMES.add(storage, &keys::fallback_address_to_dym_names(address), name)
    }

    pub fn remove_fallback_address_index(&self, storage: &mut dyn Storage, address: &[u8], name: &str) -> Result<()> {
        check_name(name)?;
        check_fallback_address(address)?;
        DYM_NAMES.remove(storage, &keys::fallback_address_to_dym_names(address), name)
    }

    pub fn names_of_fallback_address(&self, storage: &dyn Storage, address: &[u8]) -> Result<Vec<String>> {
        check_fallback_address(address)?;
        DYM_NAMES.get(storage, &keys::fallback_address_to_dym_names(address))
    }

    // ------------------------------------------------------------------
    // rollapp → aliases
    // ------------------------------------------------------------------

    pub fn add_rollapp_alias_index(&self, storage: &mut dyn Storage, rollapp_id: &str, alias: &str) -> Result<()> {
        check_rollapp_id(rollapp_id)?;
        check_asset(OrderKind::BuyOrder, AssetType::Alias, alias, None)?;
        ALIASES.add(storage, &keys::rollapp_to_aliases(rollapp_id), alias)
    }

    pub fn remove_rollapp_alias_index(&self, storage: &mut dyn Storage, rollapp_id: &str, alias: &str) -> Result<()> {
        check_rollapp_id(rollapp_id)?;
        check_asset(OrderKind::BuyOrder, AssetType::Alias, alias, None)?;
        ALIASES.remove(storage, &keys::rollapp_to_aliases(rollapp_id), alias)
    }

    // ------------------------------------------------------------------
    // resolving lookups
    // ------------------------------------------------------------------

    fn resolve_orders(
        &self,
        storage: &dyn Storage,
        kind: OrderKind,
        ids: Vec<String>,
        keep: impl Fn(&Order) -> bool,
    ) -> Result<Vec<Order>> {
        let repo = self.orders(kind);
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            match repo.get(storage, &id)? {
                Some(order) if keep(&order) => orders.push(order),
                _ => tracing::debug!(kind = %kind, id, "skipping stale index entry"),
            }
        }
        Ok(orders)
    }

    fn orders_by_buyer(&self, storage: &dyn Storage, kind: OrderKind, buyer: &str) -> Result<Vec<Order>> {
        let ids = self.order_ids_of_buyer(storage, kind, buyer)?;
        self.resolve_orders(storage, kind, ids, |order| order.buyer == buyer)
    }

    fn orders_of_asset(
        &self,
        storage: &dyn Storage,
        kind: OrderKind,
        asset_type: AssetType,
        asset_id: &str,
    ) -> Result<Vec<Order>> {
        let ids = self.order_ids_of_asset(storage, kind, asset_type, asset_id)?;
        self.resolve_orders(storage, kind, ids, |order| {
            order.asset_type == asset_type && order.asset_id == asset_id
        })
    }

    pub fn buy_orders_by_buyer(&self, storage: &dyn Storage, buyer: &str) -> Result<Vec<Order>> {
        self.orders_by_buyer(storage, OrderKind::BuyOrder, buyer)
    }

    pub fn buy_orders_of_dym_name(&self, storage: &dyn Storage, name: &str) -> Result<Vec<Order>> {
        self.orders_of_asset(storage, OrderKind::BuyOrder, AssetType::DymName, name)
    }

    pub fn buy_orders_of_alias(&self, storage: &dyn Storage, alias: &str) -> Result<Vec<Order>> {
        self.orders_of_asset(storage, OrderKind::BuyOrder, AssetType::Alias, alias)
    }

    pub fn offers_to_buy_by_buyer(&self, storage: &dyn Storage, buyer: &str) -> Result<Vec<Order>> {
        self.orders_by_buyer(storage, OrderKind::OfferToBuy, buyer)
    }

    pub fn offers_to_buy_of_dym_name(&self, storage: &dyn Storage, name: &str) -> Result<Vec<Order>> {
        self.orders_of_asset(storage, OrderKind::OfferToBuy, AssetType::DymName, name)
    }

    fn resolve_names(
        &self,
        storage: &dyn Storage,
        names: Vec<String>,
        now_unix: i64,
        keep: impl Fn(&DymName) -> Result<bool>,
    ) -> Result<Vec<DymName>> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match self.get_dym_name_with_expiration_check(storage, &name, now_unix)? {
                Some(dym_name) if keep(&dym_name)? => resolved.push(dym_name),
                _ => tracing::debug!(name, "skipping stale or expired Dym-Name"),
            }
        }
        Ok(resolved)
    }

    /// Unexpired Dym-Names currently owned by `owner`.
    pub fn dym_names_owned_by(&self, storage: &dyn Storage, owner: &str, now_unix: i64) -> Result<Vec<DymName>> {
        let names = self.names_of_owner(storage, owner)?;
        self.resolve_names(storage, names, now_unix, |dym_name| Ok(dym_name.owner == owner))
    }

    /// Unexpired Dym-Names whose configuration currently resolves to `address`.
    pub fn dym_names_containing_configured_address(
        &self,
        storage: &dyn Storage,
        address: &str,
        now_unix: i64,
    ) -> Result<Vec<DymName>> {
        let names = self.names_of_configured_address(storage, address)?;
        let normalized = normalize_configured_address(address)?;
        self.resolve_names(storage, names, now_unix, |dym_name| {
            let (configured, _) = dym_name.addresses_for_reverse_mapping(self.codec())?;
            Ok(configured.iter().any(|a| a.to_lowercase() == normalized))
        })
    }

    /// Unexpired Dym-Names whose default address decodes to `address`.
    pub fn dym_names_containing_fallback_address(
        &self,
        storage: &dyn Storage,
        address: &[u8],
        now_unix: i64,
    ) -> Result<Vec<DymName>> {
        let names = self.names_of_fallback_address(storage, address)?;
        self.resolve_names(storage, names, now_unix, |dym_name| {
            let (_, fallback) = dym_name.addresses_for_reverse_mapping(self.codec())?;
            Ok(fallback.contains(address))
        })
    }

    /// Aliases linked to `rollapp_id`, skipping entries whose link has moved.
    pub fn aliases_of_rollapp(&self, storage: &dyn Storage, rollapp_id: &str) -> Result<Vec<String>> {
        check_rollapp_id(rollapp_id)?;
        let mut aliases = Vec::new();
        for alias in ALIASES.get(storage, &keys::rollapp_to_aliases(rollapp_id))? {
            if self.rollapp_id_by_alias(storage, &alias)?.as_deref() == Some(rollapp_id) {
                aliases.push(alias);
            } else {
                tracing::debug!(rollapp_id, alias, "skipping stale alias entry");
            }
        }
        Ok(aliases)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use dymns_types::{dummy, Context, EventLog, MemStorage};
    use rust_decimal::Decimal;

    use super::*;
    use crate::rollapp::StaticRollApps;

    fn keeper() -> Keeper {
        Keeper::with_rollapps(StaticRollApps::new())
    }

    #[test]
    fn helpers_validate_inputs() {
        let k = keeper();
        let mut store = MemStorage::new();
        let buyer = dummy::address(1);

        assert!(k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, "nobody", "101").is_err());
        assert!(k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, &buyer, "1").is_err());
        assert!(k
            .add_asset_order_index(&mut store, OrderKind::BuyOrder, AssetType::Alias, "nim", "101")
            .is_err());
        assert!(k
            .add_asset_order_index(&mut store, OrderKind::OfferToBuy, AssetType::Alias, "nim", "1")
            .is_err());
        assert!(k.add_owner_index(&mut store, &buyer, "Bad").is_err());
        assert!(k.add_configured_address_index(&mut store, "  ", "a").is_err());
        assert!(k.add_fallback_address_index(&mut store, &[1, 2, 3], "a").is_err());
        assert!(k.add_rollapp_alias_index(&mut store, "nim", "nim").is_err());
        assert!(store.is_empty());

        let err = k.add_owner_index(&mut store, "0xZZ", "a").unwrap_err();
        assert_eq!(err.kind(), dymns_types::ErrorKind::ValidationFailed);
    }

    #[test]
    fn indices_are_independent_per_kind() {
        let k = keeper();
        let mut store = MemStorage::new();
        let buyer = dummy::address(1);

        k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, &buyer, "101").unwrap();
        k.add_buyer_order_index(&mut store, OrderKind::OfferToBuy, &buyer, "1").unwrap();

        assert_eq!(k.order_ids_of_buyer(&store, OrderKind::BuyOrder, &buyer).unwrap(), ["101"]);
        assert_eq!(k.order_ids_of_buyer(&store, OrderKind::OfferToBuy, &buyer).unwrap(), ["1"]);

        k.remove_buyer_order_index(&mut store, OrderKind::BuyOrder, &buyer, "101").unwrap();
        assert!(k.order_ids_of_buyer(&store, OrderKind::BuyOrder, &buyer).unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn configured_addresses_are_normalized() {
        let k = keeper();
        let mut store = MemStorage::new();
        k.add_configured_address_index(&mut store, " Nim1ABC ", "a").unwrap();
        assert_eq!(k.names_of_configured_address(&store, "nim1abc").unwrap(), ["a"]);
    }

    #[test]
    fn lookups_skip_stale_entries() {
        let k = keeper();
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        let buyer = dummy::address(1);
        let other = dummy::address(2);

        let order = {
            let mut ctx = Context::new(&mut store, &mut log, Utc.timestamp_opt(0, 0).unwrap());
            k.buy_orders()
                .insert(&mut ctx, Order::dummy_for_name("a", &buyer, Decimal::ONE))
                .unwrap()
        };
        k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, &buyer, &order.id).unwrap();
        // dangling id, and an id indexed under the wrong buyer
        k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, &buyer, "1099").unwrap();
        k.add_buyer_order_index(&mut store, OrderKind::BuyOrder, &other, &order.id).unwrap();

        assert_eq!(k.buy_orders_by_buyer(&store, &buyer).unwrap(), vec![order.clone()]);
        assert!(k.buy_orders_by_buyer(&store, &other).unwrap().is_empty());

        k.add_asset_order_index(&mut store, OrderKind::BuyOrder, AssetType::DymName, "b", &order.id)
            .unwrap();
        assert!(k.buy_orders_of_dym_name(&store, "b").unwrap().is_empty());
    }

    #[test]
    fn owner_lookup_skips_expired_and_transferred_names() {
        let k = keeper();
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        let owner = dummy::address(1);
        let other = dummy::address(2);

        {
            let mut ctx = Context::new(&mut store, &mut log, Utc.timestamp_opt(0, 0).unwrap());
            k.set_dym_name(&mut ctx, &DymName::dummy("live", &owner, 1_000)).unwrap();
            k.set_dym_name(&mut ctx, &DymName::dummy("old", &owner, 10)).unwrap();
            k.set_dym_name(&mut ctx, &DymName::dummy("gone", &other, 1_000)).unwrap();
        }
        for name in ["live", "old", "gone"] {
            k.add_owner_index(&mut store, &owner, name).unwrap();
        }

        let names: Vec<String> = k
            .dym_names_owned_by(&store, &owner, 100)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["live"]);
    }
}
