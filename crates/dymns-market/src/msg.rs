//! Negotiation messages and their responses.
//!
//! `validate_basic` covers everything that can be checked without reading
//! state. The negotiation engine runs it first, so a message that fails here
//! never touches the store.

use dymns_types::{
    AddressCodec, AssetType, DymnsError, Money, OrderKind, Result, is_valid_dym_name,
    is_valid_rollapp_id,
};
use serde::{Deserialize, Serialize};

fn validate_offer(offer: &Money, what: &str) -> Result<()> {
    if !offer.is_valid() {
        return Err(DymnsError::invalid(format!("invalid {what} amount: {offer}")));
    }
    if !offer.is_positive() {
        return Err(DymnsError::invalid(format!("{what} amount must be positive")));
    }
    Ok(())
}

fn validate_account(codec: &dyn AddressCodec, address: &str, role: &str) -> Result<()> {
    codec
        .decode(address)
        .map(|_| ())
        .map_err(|_| DymnsError::invalid(format!("{role} is not a valid account address: {address}")))
}

fn validate_order_id(kind: OrderKind, id: &str) -> Result<()> {
    kind.parse_id(id).map(|_| ())
}

/// Place a new buy order, or raise an existing one with `continue_order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceBuyOrder {
    pub asset_id: String,
    pub asset_type: AssetType,
    /// Alias: exactly one entry, the destination rollapp id. Dym-Name: empty.
    pub params: Vec<String>,
    pub buyer: String,
    pub continue_order_id: Option<String>,
    pub offer: Money,
}

impl PlaceBuyOrder {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        match self.asset_type {
            AssetType::DymName => {
                if !is_valid_dym_name(&self.asset_id) {
                    return Err(DymnsError::InvalidAssetId {
                        asset_type: self.asset_type,
                        asset_id: self.asset_id.clone(),
                    });
                }
                if !self.params.is_empty() {
                    return Err(DymnsError::invalid(
                        "not accept order params for asset type Dym-Name",
                    ));
                }
            }
            AssetType::Alias => {
                if !self.asset_type.is_valid_asset_id(&self.asset_id) {
                    return Err(DymnsError::InvalidAssetId {
                        asset_type: self.asset_type,
                        asset_id: self.asset_id.clone(),
                    });
                }
                match self.params.as_slice() {
                    [rollapp_id] if is_valid_rollapp_id(rollapp_id) => {}
                    [rollapp_id] => {
                        return Err(DymnsError::invalid(format!(
                            "invalid RollApp ID format: {rollapp_id}"
                        )));
                    }
                    _ => {
                        return Err(DymnsError::invalid(
                            "expect 1 order param of RollApp ID for asset type Alias",
                        ));
                    }
                }
            }
        }

        validate_account(codec, &self.buyer, "buyer")?;

        if let Some(continue_id) = &self.continue_order_id {
            let parsed = OrderKind::BuyOrder.parse_id(continue_id)?;
            if parsed.asset_type != self.asset_type {
                return Err(DymnsError::InvalidOrderId(format!(
                    "{continue_id}: continue order id is not a {} order",
                    self.asset_type
                )));
            }
        }

        validate_offer(&self.offer, "offer")
    }
}

/// Accept a buy order at `min_accept`, or counter with a higher value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptBuyOrder {
    pub order_id: String,
    pub owner: String,
    pub min_accept: Money,
}

impl AcceptBuyOrder {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        validate_order_id(OrderKind::BuyOrder, &self.order_id)?;
        validate_account(codec, &self.owner, "owner")?;
        validate_offer(&self.min_accept, "min-accept")
    }
}

/// Withdraw a buy order and get the escrow back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBuyOrder {
    pub order_id: String,
    pub buyer: String,
}

impl CancelBuyOrder {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        validate_order_id(OrderKind::BuyOrder, &self.order_id)?;
        validate_account(codec, &self.buyer, "buyer")
    }
}

/// Place or raise an offer-to-buy for a Dym-Name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOfferToBuy {
    pub name: String,
    pub buyer: String,
    pub continue_offer_id: Option<String>,
    pub offer: Money,
}

impl PlaceOfferToBuy {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        if !is_valid_dym_name(&self.name) {
            return Err(DymnsError::InvalidAssetId {
                asset_type: AssetType::DymName,
                asset_id: self.name.clone(),
            });
        }
        validate_account(codec, &self.buyer, "buyer")?;
        if let Some(continue_id) = &self.continue_offer_id {
            validate_order_id(OrderKind::OfferToBuy, continue_id)?;
        }
        validate_offer(&self.offer, "offer")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOfferToBuy {
    pub offer_id: String,
    pub owner: String,
    pub min_accept: Money,
}

impl AcceptOfferToBuy {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        validate_order_id(OrderKind::OfferToBuy, &self.offer_id)?;
        validate_account(codec, &self.owner, "owner")?;
        validate_offer(&self.min_accept, "min-accept")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOfferToBuy {
    pub offer_id: String,
    pub buyer: String,
}

impl CancelOfferToBuy {
    pub fn validate_basic(&self, codec: &dyn AddressCodec) -> Result<()> {
        validate_order_id(OrderKind::OfferToBuy, &self.offer_id)?;
        validate_account(codec, &self.buyer, "buyer")
    }
}

/// Result of a place: the id of the created or raised order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub order_id: String,
}

/// Result of an accept: `true` on match, `false` when a counter-offer was
/// recorded instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOrderResponse {
    pub accepted: bool,
}

#[cfg(test)]
mod tests {
    use dymns_types::{dummy, HexAddressCodec};
    use rust_decimal::Decimal;

    use super::*;

    fn adym(n: i64) -> Money {
        Money::new("adym", Decimal::new(n, 0))
    }

    fn place_name() -> PlaceBuyOrder {
        PlaceBuyOrder {
            asset_id: "my-name".into(),
            asset_type: AssetType::DymName,
            params: Vec::new(),
            buyer: dummy::address(1),
            continue_order_id: None,
            offer: adym(100),
        }
    }

    fn place_alias() -> PlaceBuyOrder {
        PlaceBuyOrder {
            asset_id: "nim".into(),
            asset_type: AssetType::Alias,
            params: vec!["mars_1123-1".into()],
            ..place_name()
        }
    }

    fn error_of(msg: &PlaceBuyOrder) -> String {
        msg.validate_basic(&HexAddressCodec).unwrap_err().to_string()
    }

    #[test]
    fn place_buy_order_valid() {
        assert!(place_name().validate_basic(&HexAddressCodec).is_ok());
        assert!(place_alias().validate_basic(&HexAddressCodec).is_ok());

        let mut raise = place_name();
        raise.continue_order_id = Some("101".into());
        assert!(raise.validate_basic(&HexAddressCodec).is_ok());

        let mut raise = place_alias();
        raise.continue_order_id = Some("201".into());
        assert!(raise.validate_basic(&HexAddressCodec).is_ok());
    }

    #[test]
    fn place_buy_order_rejects_malformed() {
        let mut msg = place_name();
        msg.asset_id = "-bad".into();
        assert!(error_of(&msg).contains("Invalid Dym-Name"));

        let mut msg = place_alias();
        msg.asset_id = "Nim".into();
        assert!(error_of(&msg).contains("Invalid Alias"));

        let mut msg = place_name();
        msg.params = vec!["mars_1123-1".into()];
        assert!(error_of(&msg).contains("not accept order params"));

        let mut msg = place_alias();
        msg.params.clear();
        assert!(error_of(&msg).contains("expect 1 order param"));

        let mut msg = place_alias();
        msg.params = vec!["mars".into()];
        assert!(error_of(&msg).contains("invalid RollApp ID format"));

        let mut msg = place_name();
        msg.buyer = "nobody".into();
        assert!(error_of(&msg).contains("buyer is not a valid account address"));

        let mut msg = place_name();
        msg.continue_order_id = Some("201".into());
        assert!(error_of(&msg).contains("DNS_ERR_103"));

        let mut msg = place_name();
        msg.continue_order_id = Some("1x".into());
        assert!(error_of(&msg).contains("DNS_ERR_103"));

        let mut msg = place_name();
        msg.offer = adym(0);
        assert!(error_of(&msg).contains("must be positive"));

        let mut msg = place_name();
        msg.offer = adym(-1);
        assert!(error_of(&msg).contains("invalid offer amount"));
    }

    #[test]
    fn accept_and_cancel_validation() {
        let owner = dummy::address(2);
        let ok = AcceptBuyOrder {
            order_id: "101".into(),
            owner: owner.clone(),
            min_accept: adym(100),
        };
        assert!(ok.validate_basic(&HexAddressCodec).is_ok());
        assert!(AcceptBuyOrder {
            order_id: "1".into(),
            ..ok.clone()
        }
        .validate_basic(&HexAddressCodec)
        .is_err());
        assert!(AcceptBuyOrder {
            min_accept: adym(0),
            ..ok
        }
        .validate_basic(&HexAddressCodec)
        .is_err());

        let cancel = CancelBuyOrder {
            order_id: "201".into(),
            buyer: owner.clone(),
        };
        assert!(cancel.validate_basic(&HexAddressCodec).is_ok());

        let cancel_otb = CancelOfferToBuy {
            offer_id: "101".into(),
            buyer: owner,
        };
        // plain sequence numbers, so "101" is simply offer 101
        assert!(cancel_otb.validate_basic(&HexAddressCodec).is_ok());
    }

    #[test]
    fn offer_to_buy_validation() {
        let msg = PlaceOfferToBuy {
            name: "my-name".into(),
            buyer: dummy::address(1),
            continue_offer_id: Some("3".into()),
            offer: adym(5),
        };
        assert!(msg.validate_basic(&HexAddressCodec).is_ok());

        let bad = PlaceOfferToBuy {
            continue_offer_id: Some("0".into()),
            ..msg.clone()
        };
        assert!(bad.validate_basic(&HexAddressCodec).is_err());

        let accept = AcceptOfferToBuy {
            offer_id: "3".into(),
            owner: "0xABC".into(),
            min_accept: adym(5),
        };
        assert!(accept.validate_basic(&HexAddressCodec).is_err());
    }
}
