//! Offers-to-buy: the older, Dym-Name-only order kind.
//!
//! Same lifecycle and escrow rule as buy orders (see
//! [`negotiation`](crate::negotiation)), with plain numeric ids.

use dymns_escrow::BankKeeper;
use dymns_types::{AddressCodec, AssetType, Context, DymnsError, Order, OrderKind, Result};

use crate::{
    keeper::Keeper,
    msg::{AcceptOfferToBuy, AcceptOrderResponse, CancelOfferToBuy, PlaceOfferToBuy, PlaceOrderResponse},
    negotiation::Handover,
    rollapp::RollAppKeeper,
};

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    /// Place a new offer-to-buy, or raise one with `continue_offer_id`.
    pub fn place_offer_to_buy(&self, ctx: &mut Context<'_>, msg: &PlaceOfferToBuy) -> Result<PlaceOrderResponse> {
        msg.validate_basic(self.codec())?;
        self.check_trading_enabled(AssetType::DymName)?;
        self.tradable_dym_name(ctx, &msg.name, &msg.buyer)?;
        self.check_offer_price(&msg.offer)?;

        let proposal = Order::new(
            msg.name.clone(),
            AssetType::DymName,
            Vec::new(),
            msg.buyer.clone(),
            msg.offer.clone(),
        );
        let offer = match &msg.continue_offer_id {
            Some(continue_id) => {
                let existing = self.order_to_raise(ctx, OrderKind::OfferToBuy, continue_id, &proposal)?;
                self.raise_order(ctx, OrderKind::OfferToBuy, existing, msg.offer.clone())?
            }
            None => self.open_order(ctx, OrderKind::OfferToBuy, proposal)?,
        };

        Ok(PlaceOrderResponse { order_id: offer.id })
    }

    /// Accept an offer-to-buy (`min_accept == offer`) or counter it (`>`).
    pub fn accept_offer_to_buy(&self, ctx: &mut Context<'_>, msg: &AcceptOfferToBuy) -> Result<AcceptOrderResponse> {
        msg.validate_basic(self.codec())?;
        let offer = self
            .offers_to_buy()
            .get(ctx.storage, &msg.offer_id)?
            .ok_or_else(|| DymnsError::OrderNotFound(msg.offer_id.clone()))?;
        self.check_trading_enabled(AssetType::DymName)?;

        let dym_name = self
            .get_dym_name_with_expiration_check(ctx.storage, &offer.asset_id, ctx.block_unix())?
            .ok_or_else(|| DymnsError::DymNameNotFound(offer.asset_id.clone()))?;
        if dym_name.owner != msg.owner {
            return Err(DymnsError::denied("not the owner of the Dym-Name"));
        }
        Self::check_accept_terms(&offer, &msg.owner, &msg.min_accept)?;

        let accepted = self.settle_accept(
            ctx,
            OrderKind::OfferToBuy,
            offer,
            msg.min_accept.clone(),
            &msg.owner,
            Handover::DymName(dym_name),
        )?;
        Ok(AcceptOrderResponse { accepted })
    }

    /// Cancel an offer-to-buy and refund its escrow.
    pub fn cancel_offer_to_buy(&self, ctx: &mut Context<'_>, msg: &CancelOfferToBuy) -> Result<()> {
        msg.validate_basic(self.codec())?;
        self.cancel_order(ctx, OrderKind::OfferToBuy, &msg.offer_id, &msg.buyer)
    }
}
