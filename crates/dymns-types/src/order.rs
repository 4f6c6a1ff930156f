//! Escrowed purchase offers.
//!
//! Two order kinds share one shape: [`OrderKind::BuyOrder`] (placed against a
//! Dym-Name or an Alias, ID prefixed by asset type) and the legacy
//! [`OrderKind::OfferToBuy`] (Dym-Names only, plain numeric ID).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants, event, Action, AddressCodec, AssetType, DymnsError, Event, Money, Result,
    is_valid_rollapp_id,
};

/// Which order book an order lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderKind {
    BuyOrder,
    OfferToBuy,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyOrder => write!(f, "Buy-Order"),
            Self::OfferToBuy => write!(f, "Offer-To-Buy"),
        }
    }
}

/// The components encoded in an order ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedOrderId {
    pub asset_type: AssetType,
    pub sequence: u64,
}

/// Decimal digits with no sign and no leading zero, parsing to a value > 0.
fn parse_sequence(s: &str) -> Option<u64> {
    if s.is_empty() || s.starts_with('0') || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|n| *n > 0)
}

impl OrderKind {
    /// Event type emitted for orders of this kind.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::BuyOrder => event::EVENT_TYPE_BUY_ORDER,
            Self::OfferToBuy => event::EVENT_TYPE_OFFER_TO_BUY,
        }
    }

    /// Render the ID of the `sequence`-th order of `asset_type`.
    #[must_use]
    pub fn format_id(self, asset_type: AssetType, sequence: u64) -> String {
        match self {
            Self::BuyOrder => format!("{}{sequence}", asset_type.buy_order_id_prefix()),
            Self::OfferToBuy => sequence.to_string(),
        }
    }

    /// Parse an order ID of this kind.
    ///
    /// # Errors
    /// Returns [`DymnsError::InvalidOrderId`] if the ID is malformed.
    pub fn parse_id(self, id: &str) -> Result<ParsedOrderId> {
        let invalid = || DymnsError::InvalidOrderId(id.to_string());
        match self {
            Self::BuyOrder => {
                if id.len() <= constants::BUY_ORDER_ID_PREFIX_LEN || !id.is_ascii() {
                    return Err(invalid());
                }
                let (prefix, rest) = id.split_at(constants::BUY_ORDER_ID_PREFIX_LEN);
                let asset_type = AssetType::from_buy_order_id_prefix(prefix).ok_or_else(invalid)?;
                let sequence = parse_sequence(rest).ok_or_else(invalid)?;
                Ok(ParsedOrderId {
                    asset_type,
                    sequence,
                })
            }
            Self::OfferToBuy => Ok(ParsedOrderId {
                asset_type: AssetType::DymName,
                sequence: parse_sequence(id).ok_or_else(invalid)?,
            }),
        }
    }

    #[must_use]
    pub fn is_valid_id(self, id: &str) -> bool {
        self.parse_id(id).is_ok()
    }
}

/// An escrowed offer to buy an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Empty only before insertion.
    pub id: String,
    pub asset_id: String,
    pub asset_type: AssetType,
    /// For alias orders: exactly one entry, the destination rollapp id.
    pub params: Vec<String>,
    pub buyer: String,
    pub offer_price: Money,
    /// Price the owner asked for in a counter-offer.
    pub counterparty_offer_price: Option<Money>,
}

impl Order {
    /// Build a not-yet-inserted order (empty id, no counter-offer).
    #[must_use]
    pub fn new(
        asset_id: impl Into<String>,
        asset_type: AssetType,
        params: Vec<String>,
        buyer: impl Into<String>,
        offer_price: Money,
    ) -> Self {
        Self {
            id: String::new(),
            asset_id: asset_id.into(),
            asset_type,
            params,
            buyer: buyer.into(),
            offer_price,
            counterparty_offer_price: None,
        }
    }

    /// Check every field of a persisted order of `kind`.
    pub fn validate(&self, kind: OrderKind, codec: &dyn AddressCodec) -> Result<()> {
        if self.id.is_empty() {
            return Err(DymnsError::InvalidOrderId("ID of order is empty".to_string()));
        }
        let parsed = kind.parse_id(&self.id)?;
        if parsed.asset_type != self.asset_type {
            return Err(DymnsError::InvalidOrderId(format!(
                "{}: mismatch asset type {}",
                self.id, self.asset_type
            )));
        }
        if !self.asset_type.is_valid_asset_id(&self.asset_id) {
            return Err(DymnsError::InvalidAssetId {
                asset_type: self.asset_type,
                asset_id: self.asset_id.clone(),
            });
        }
        self.validate_params()?;
        codec.decode(&self.buyer)?;
        if !self.offer_price.is_valid() || !self.offer_price.is_positive() {
            return Err(DymnsError::invalid(format!(
                "offer price must be positive: {}",
                self.offer_price
            )));
        }
        if let Some(counterparty) = &self.counterparty_offer_price {
            if !counterparty.is_valid() {
                return Err(DymnsError::invalid(format!(
                    "counterparty offer price is invalid: {counterparty}"
                )));
            }
            if !counterparty.same_denom(&self.offer_price) {
                return Err(DymnsError::DenomMismatch {
                    expected: self.offer_price.denom.clone(),
                    actual: counterparty.denom.clone(),
                });
            }
        }
        Ok(())
    }

    /// Params must be empty for names and a single rollapp id for aliases.
    pub fn validate_params(&self) -> Result<()> {
        match self.asset_type {
            AssetType::DymName if !self.params.is_empty() => {
                Err(DymnsError::invalid("not accept order params for Dym-Name"))
            }
            AssetType::DymName => Ok(()),
            AssetType::Alias => match self.params.as_slice() {
                [rollapp_id] if is_valid_rollapp_id(rollapp_id) => Ok(()),
                [rollapp_id] => Err(DymnsError::invalid(format!(
                    "invalid destination rollapp id: {rollapp_id}"
                ))),
                _ => Err(DymnsError::invalid(
                    "expect 1 order param of RollApp ID for Alias",
                )),
            },
        }
    }

    /// Destination rollapp of an alias order.
    #[must_use]
    pub fn destination_rollapp(&self) -> Option<&str> {
        match self.asset_type {
            AssetType::Alias => self.params.first().map(String::as_str),
            AssetType::DymName => None,
        }
    }

    #[must_use]
    pub fn event(&self, kind: OrderKind, action: Action) -> Event {
        let counterparty = self
            .counterparty_offer_price
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        Event::new(kind.event_type())
            .attr("id", &self.id)
            .attr("asset_id", &self.asset_id)
            .attr("asset_type", self.asset_type.to_string())
            .attr("buyer", &self.buyer)
            .attr("offer_price", self.offer_price.to_string())
            .attr("counterparty_offer_price", counterparty)
            .attr("action", action.as_str())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy_for_name(name: &str, buyer: &str, price: rust_decimal::Decimal) -> Self {
        Self::new(
            name,
            AssetType::DymName,
            Vec::new(),
            buyer,
            Money::new(constants::DEFAULT_PRICE_DENOM, price),
        )
    }

    pub fn dummy_for_alias(
        alias: &str,
        destination_rollapp: &str,
        buyer: &str,
        price: rust_decimal::Decimal,
    ) -> Self {
        Self::new(
            alias,
            AssetType::Alias,
            vec![destination_rollapp.to_string()],
            buyer,
            Money::new(constants::DEFAULT_PRICE_DENOM, price),
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{dummy, HexAddressCodec};

    #[test]
    fn buy_order_id_format_and_parse() {
        assert_eq!(OrderKind::BuyOrder.format_id(AssetType::DymName, 1), "101");
        assert_eq!(OrderKind::BuyOrder.format_id(AssetType::Alias, 2), "202");
        assert_eq!(OrderKind::OfferToBuy.format_id(AssetType::DymName, 7), "7");

        let parsed = OrderKind::BuyOrder.parse_id("2012").unwrap();
        assert_eq!(parsed.asset_type, AssetType::Alias);
        assert_eq!(parsed.sequence, 12);
    }

    #[test]
    fn buy_order_id_validity() {
        for ok in ["101", "2099", "1018446744073709551615"] {
            assert!(OrderKind::BuyOrder.is_valid_id(ok), "rejected {ok:?}");
        }
        for bad in ["", "10", "100", "1001", "30123", "10a", "10+1", "1018446744073709551616"] {
            assert!(!OrderKind::BuyOrder.is_valid_id(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn offer_to_buy_id_validity() {
        assert!(OrderKind::OfferToBuy.is_valid_id("1"));
        assert!(OrderKind::OfferToBuy.is_valid_id("42"));
        assert!(!OrderKind::OfferToBuy.is_valid_id("0"));
        assert!(!OrderKind::OfferToBuy.is_valid_id("-1"));
        assert!(!OrderKind::OfferToBuy.is_valid_id("x"));
    }

    #[test]
    fn validate_accepts_well_formed_orders() {
        let buyer = dummy::address(1);
        let mut order = Order::dummy_for_name("my-name", &buyer, Decimal::new(100, 0));
        order.id = "101".into();
        assert!(order.validate(OrderKind::BuyOrder, &HexAddressCodec).is_ok());

        let mut alias = Order::dummy_for_alias("dym", "nim_1122-1", &buyer, Decimal::new(100, 0));
        alias.id = "201".into();
        assert!(alias.validate(OrderKind::BuyOrder, &HexAddressCodec).is_ok());

        let mut otb = Order::dummy_for_name("my-name", &buyer, Decimal::new(100, 0));
        otb.id = "1".into();
        assert!(otb.validate(OrderKind::OfferToBuy, &HexAddressCodec).is_ok());
    }

    #[test]
    fn validate_rejects_mismatches() {
        let buyer = dummy::address(1);
        let base = {
            let mut o = Order::dummy_for_name("my-name", &buyer, Decimal::new(100, 0));
            o.id = "101".into();
            o
        };

        let mut wrong_prefix = base.clone();
        wrong_prefix.id = "201".into();
        assert!(wrong_prefix.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());

        let mut empty_id = base.clone();
        empty_id.id.clear();
        assert!(empty_id.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());

        let mut with_params = base.clone();
        with_params.params = vec!["nim_1122-1".into()];
        assert!(with_params.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());

        let mut bad_buyer = base.clone();
        bad_buyer.buyer = "nobody".into();
        assert!(bad_buyer.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());

        let mut zero_price = base.clone();
        zero_price.offer_price.amount = Decimal::ZERO;
        assert!(zero_price.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());

        let mut other_denom = base.clone();
        other_denom.counterparty_offer_price = Some(Money::new("uatom", Decimal::ONE));
        let err = other_denom.validate(OrderKind::BuyOrder, &HexAddressCodec).unwrap_err();
        assert!(matches!(err, DymnsError::DenomMismatch { .. }));

        let mut alias_no_params = Order::dummy_for_alias("dym", "nim_1122-1", &buyer, Decimal::ONE);
        alias_no_params.id = "201".into();
        alias_no_params.params.clear();
        assert!(alias_no_params.validate(OrderKind::BuyOrder, &HexAddressCodec).is_err());
    }

    #[test]
    fn event_reports_action_and_empty_counterparty() {
        let buyer = dummy::address(1);
        let mut order = Order::dummy_for_name("a", &buyer, Decimal::new(100, 0));
        order.id = "101".into();
        let ev = order.event(OrderKind::BuyOrder, Action::Created);
        assert_eq!(ev.ty, event::EVENT_TYPE_BUY_ORDER);
        assert_eq!(ev.get("action"), Some("created"));
        assert_eq!(ev.get("counterparty_offer_price"), Some(""));
        assert_eq!(ev.get("offer_price"), Some("100adym"));
    }
}
