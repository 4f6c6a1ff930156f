//! Whole-store invariant checks.
//!
//! ```text
//! escrow   ∀ denom: module balance == Σ offer_price of open orders (both kinds)
//! orders   every open order is indexed under its buyer and its asset, and
//!          every index entry resolves to an order of that buyer / asset
//! names    every Dym-Name is indexed under its owner and its configured and
//!          fallback addresses, and every such entry resolves back
//! aliases  alias → rollapp records and rollapp → aliases lists agree
//! ```
//!
//! A failed ownership transfer that left old and new index entries side by
//! side shows up here as an [`DymnsError::IndexInvariantViolation`].

use std::collections::BTreeSet;

use dymns_escrow::{BankKeeper, EscrowConservation};
use dymns_store::{Aliases, DymNames, IndexCodec, Namespace, OrderIds};
use dymns_types::{AddressCodec, AssetType, DymName, DymnsError, Money, Order, OrderKind, Result, Storage};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

/// What [`Keeper::check_invariants`] looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvariantReport {
    pub buy_orders: usize,
    pub offers_to_buy: usize,
    pub dym_names: usize,
    pub aliases: usize,
    pub escrow_held: Vec<Money>,
}

fn violation(reason: String) -> DymnsError {
    DymnsError::IndexInvariantViolation { reason }
}

/// `(key suffix after the namespace byte, encoded ids)` for every record in `ns`.
fn index_records(storage: &dyn Storage, ns: Namespace) -> Vec<(Vec<u8>, Vec<u8>)> {
    storage
        .scan_prefix(&ns.prefix())
        .map(|(key, value)| (key[1..].to_vec(), value))
        .collect()
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    /// Run every check, stopping at the first violation.
    pub fn check_invariants(&self, storage: &dyn Storage) -> Result<InvariantReport> {
        let mut report = InvariantReport::default();
        let mut conservation = EscrowConservation::new();

        for kind in [OrderKind::BuyOrder, OrderKind::OfferToBuy] {
            let orders = self.orders(kind).list_all(storage)?;
            for order in &orders {
                conservation.record_open_order(&order.offer_price);
                self.check_order_indexed(storage, kind, order)?;
            }
            self.check_order_index_entries(storage, kind)?;
            match kind {
                OrderKind::BuyOrder => report.buy_orders = orders.len(),
                OrderKind::OfferToBuy => report.offers_to_buy = orders.len(),
            }
        }

        let held = self.escrow().held_all(storage)?;
        conservation.verify_all(&held)?;
        report.escrow_held = held;

        let dym_names = self.all_dym_names(storage)?;
        for dym_name in &dym_names {
            self.check_dym_name_indexed(storage, dym_name)?;
        }
        self.check_dym_name_index_entries(storage)?;
        report.dym_names = dym_names.len();

        report.aliases = self.check_alias_links(storage)?;

        tracing::debug!(
            buy_orders = report.buy_orders,
            offers_to_buy = report.offers_to_buy,
            dym_names = report.dym_names,
            aliases = report.aliases,
            "invariants hold"
        );
        Ok(report)
    }

    fn check_order_indexed(&self, storage: &dyn Storage, kind: OrderKind, order: &Order) -> Result<()> {
        if !self
            .order_ids_of_buyer(storage, kind, &order.buyer)?
            .contains(&order.id)
        {
            return Err(violation(format!(
                "{kind} {} is not indexed under its buyer {}",
                order.id, order.buyer
            )));
        }
        if !self
            .order_ids_of_asset(storage, kind, order.asset_type, &order.asset_id)?
            .contains(&order.id)
        {
            return Err(violation(format!(
                "{kind} {} is not indexed under its {} {}",
                order.id, order.asset_type, order.asset_id
            )));
        }
        Ok(())
    }

    fn check_order_index_entries(&self, storage: &dyn Storage, kind: OrderKind) -> Result<()> {
        let repo = self.orders(kind);
        let resolve = |id: &str| -> Result<Order> {
            repo.get(storage, id)?
                .ok_or_else(|| violation(format!("index references missing {kind} {id}")))
        };

        let buyer_ns = match kind {
            OrderKind::BuyOrder => Namespace::BuyerToBuyOrders,
            OrderKind::OfferToBuy => Namespace::BuyerToOffersToBuy,
        };
        for (buyer, bytes) in index_records(storage, buyer_ns) {
            for id in OrderIds::decode(&bytes)? {
                let order = resolve(&id)?;
                if self.codec().decode(&order.buyer)? != buyer {
                    return Err(violation(format!(
                        "{kind} {id} is indexed under 0x{} but its buyer is {}",
                        hex::encode(&buyer),
                        order.buyer
                    )));
                }
            }
        }

        let asset_namespaces: &[(Namespace, AssetType)] = match kind {
            OrderKind::BuyOrder => &[
                (Namespace::DymNameToBuyOrders, AssetType::DymName),
                (Namespace::AliasToBuyOrders, AssetType::Alias),
            ],
            OrderKind::OfferToBuy => &[(Namespace::DymNameToOffersToBuy, AssetType::DymName)],
        };
        for &(ns, asset_type) in asset_namespaces {
            for (asset_id, bytes) in index_records(storage, ns) {
                for id in OrderIds::decode(&bytes)? {
                    let order = resolve(&id)?;
                    if order.asset_type != asset_type || order.asset_id.as_bytes() != asset_id.as_slice() {
                        return Err(violation(format!(
                            "{kind} {id} is indexed under {asset_type} {} but targets {} {}",
                            String::from_utf8_lossy(&asset_id),
                            order.asset_type,
                            order.asset_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_dym_name_indexed(&self, storage: &dyn Storage, dym_name: &DymName) -> Result<()> {
        let name = &dym_name.name;
        if !self.names_of_owner(storage, &dym_name.owner)?.contains(name) {
            return Err(violation(format!("Dym-Name {name} is not indexed under its owner")));
        }
        let (configured, fallback) = dym_name.addresses_for_reverse_mapping(self.codec())?;
        for address in &configured {
            if !self.names_of_configured_address(storage, address)?.contains(name) {
                return Err(violation(format!(
                    "Dym-Name {name} is not indexed under configured address {address}"
                )));
            }
        }
        for address in &fallback {
            if !self.names_of_fallback_address(storage, address)?.contains(name) {
                return Err(violation(format!(
                    "Dym-Name {name} is not indexed under fallback address 0x{}",
                    hex::encode(address)
                )));
            }
        }
        Ok(())
    }

    fn check_dym_name_index_entries(&self, storage: &dyn Storage) -> Result<()> {
        let resolve = |name: &str| -> Result<DymName> {
            self.get_dym_name(storage, name)?
                .ok_or_else(|| violation(format!("index references missing Dym-Name {name}")))
        };

        for (owner, bytes) in index_records(storage, Namespace::OwnerToDymNames) {
            for name in DymNames::decode(&bytes)? {
                let dym_name = resolve(&name)?;
                if self.codec().decode(&dym_name.owner)? != owner {
                    return Err(violation(format!(
                        "Dym-Name {name} is indexed under former owner 0x{}",
                        hex::encode(&owner)
                    )));
                }
            }
        }

        for (address, bytes) in index_records(storage, Namespace::ConfiguredAddressToDymNames) {
            let address = String::from_utf8_lossy(&address).into_owned();
            for name in DymNames::decode(&bytes)? {
                let (configured, _) = resolve(&name)?.addresses_for_reverse_mapping(self.codec())?;
                if !configured.iter().any(|a| a.trim().to_lowercase() == address) {
                    return Err(violation(format!(
                        "Dym-Name {name} is indexed under stale configured address {address}"
                    )));
                }
            }
        }

        for (address, bytes) in index_records(storage, Namespace::FallbackAddressToDymNames) {
            for name in DymNames::decode(&bytes)? {
                let (_, fallback) = resolve(&name)?.addresses_for_reverse_mapping(self.codec())?;
                if !fallback.contains(&address) {
                    return Err(violation(format!(
                        "Dym-Name {name} is indexed under stale fallback address 0x{}",
                        hex::encode(&address)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the number of linked aliases.
    fn check_alias_links(&self, storage: &dyn Storage) -> Result<usize> {
        let mut linked = BTreeSet::new();
        for (alias, bytes) in index_records(storage, Namespace::AliasToRollApp) {
            let alias = String::from_utf8_lossy(&alias).into_owned();
            let rollapp_id: String = serde_json::from_slice(&bytes)?;
            if !self.aliases_of_rollapp(storage, &rollapp_id)?.contains(&alias) {
                return Err(violation(format!(
                    "alias {alias} links to {rollapp_id} but is missing from its alias list"
                )));
            }
            linked.insert(alias);
        }

        for (rollapp_id, bytes) in index_records(storage, Namespace::RollAppToAliases) {
            let rollapp_id = String::from_utf8_lossy(&rollapp_id).into_owned();
            for alias in Aliases::decode(&bytes)? {
                if self.rollapp_id_by_alias(storage, &alias)?.as_deref() != Some(rollapp_id.as_str()) {
                    return Err(violation(format!(
                        "alias {alias} is listed under {rollapp_id} but links elsewhere"
                    )));
                }
            }
        }
        Ok(linked.len())
    }
}
