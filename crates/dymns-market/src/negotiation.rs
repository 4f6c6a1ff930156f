//! Buy-order negotiation: place, raise, accept or counter, cancel.
//!
//! # State machine
//!
//! ```text
//!            place                 accept (min_accept > offer)
//!   ∅ ───────────────► Open ─────────────────────────────► Countered
//!                       │  ▲  raise (buyer, higher price)     │
//!                       │  └──────────────────────────────────┘
//!                       │
//!                       ├── accept (min_accept == offer) ──► Matched
//!                       └── cancel ─────────────────────────► Cancelled
//! ```
//!
//! # Escrow rule
//!
//! A new order escrows its full price, a raise escrows only the difference,
//! a counter moves nothing. Match pays the escrow to the seller, cancel
//! refunds it to the buyer. At any point the module account holds exactly
//! the sum of open order prices.

use std::cmp::Ordering;

use dymns_escrow::BankKeeper;
use dymns_types::{
    Action, AddressCodec, AssetType, Context, DymName, DymnsError, Money, Order, OrderKind, Result,
};

use crate::{
    keeper::Keeper,
    msg::{AcceptBuyOrder, AcceptOrderResponse, CancelBuyOrder, PlaceBuyOrder, PlaceOrderResponse},
    rollapp::RollAppKeeper,
};

/// What changes hands when an order matches.
pub(crate) enum Handover {
    DymName(DymName),
    Alias { source: String, destination: String },
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    // ------------------------------------------------------------------
    // shared by both order kinds
    // ------------------------------------------------------------------

    pub(crate) fn check_trading_enabled(&self, asset_type: AssetType) -> Result<()> {
        if self.params().misc.trading_enabled(asset_type) {
            Ok(())
        } else {
            Err(DymnsError::precondition(format!("trading of {asset_type} is disabled")))
        }
    }

    pub(crate) fn check_offer_price(&self, offer: &Money) -> Result<()> {
        let price = &self.params().price;
        if offer.denom != price.price_denom {
            return Err(DymnsError::DenomMismatch {
                expected: price.price_denom.clone(),
                actual: offer.denom.clone(),
            });
        }
        if offer.amount < price.min_offer_price {
            return Err(DymnsError::BelowMinimumOffer {
                minimum: price.min_offer_price,
                actual: offer.amount,
            });
        }
        Ok(())
    }

    /// The Dym-Name a buyer wants, if it can be traded right now.
    pub(crate) fn tradable_dym_name(&self, ctx: &Context<'_>, name: &str, buyer: &str) -> Result<DymName> {
        let now = ctx.block_unix();
        let dym_name = self
            .get_dym_name_with_expiration_check(&*ctx.storage, name, now)?
            .ok_or_else(|| DymnsError::DymNameNotFound(name.to_string()))?;
        if dym_name.owner == buyer {
            return Err(DymnsError::invalid("cannot buy own Dym-Name"));
        }
        if dym_name.is_prohibited_trading_at(now, self.params().misc.prohibit_sell_duration_secs) {
            return Err(DymnsError::precondition(format!(
                "trading of Dym-Name {name} is prohibited close to its expiry"
            )));
        }
        Ok(dym_name)
    }

    /// Load the order a raise continues and check it belongs to `proposal`.
    pub(crate) fn order_to_raise(
        &self,
        ctx: &Context<'_>,
        kind: OrderKind,
        continue_id: &str,
        proposal: &Order,
    ) -> Result<Order> {
        let existing = self
            .orders(kind)
            .get(&*ctx.storage, continue_id)?
            .ok_or_else(|| DymnsError::OrderNotFound(continue_id.to_string()))?;
        if existing.buyer != proposal.buyer {
            return Err(DymnsError::invalid("not the owner of the offer"));
        }
        if existing.asset_id != proposal.asset_id {
            return Err(DymnsError::invalid(format!(
                "{} mismatch with existing offer",
                proposal.asset_type
            )));
        }
        if existing.asset_type != proposal.asset_type {
            return Err(DymnsError::invalid("asset type mismatch with existing offer"));
        }
        if existing.offer_price.denom != proposal.offer_price.denom {
            return Err(DymnsError::DenomMismatch {
                expected: existing.offer_price.denom,
                actual: proposal.offer_price.denom.clone(),
            });
        }
        if proposal.offer_price.amount <= existing.offer_price.amount {
            return Err(DymnsError::PriceNotHigher {
                existing: existing.offer_price.to_string(),
            });
        }
        Ok(existing)
    }

    /// Insert `order`, index it, escrow its full price.
    pub(crate) fn open_order(&self, ctx: &mut Context<'_>, kind: OrderKind, order: Order) -> Result<Order> {
        let order = self.orders(kind).insert(ctx, order)?;
        self.add_buyer_order_index(ctx.storage, kind, &order.buyer, &order.id)?;
        self.add_asset_order_index(ctx.storage, kind, order.asset_type, &order.asset_id, &order.id)?;
        self.escrow().deposit(ctx.storage, &order.buyer, &order.offer_price)?;
        Ok(order)
    }

    /// Raise `existing` to `offer`, escrowing only the difference.
    pub(crate) fn raise_order(
        &self,
        ctx: &mut Context<'_>,
        kind: OrderKind,
        mut existing: Order,
        offer: Money,
    ) -> Result<Order> {
        let delta = offer
            .checked_sub(&existing.offer_price)
            .filter(Money::is_positive)
            .ok_or_else(|| DymnsError::PriceNotHigher {
                existing: existing.offer_price.to_string(),
            })?;
        existing.offer_price = offer;
        self.orders(kind).set(ctx, &existing)?;
        self.escrow().deposit(ctx.storage, &existing.buyer, &delta)?;
        tracing::info!(kind = %kind, id = %existing.id, delta = %delta, "order raised");
        Ok(existing)
    }

    /// Delete `order` and every index entry that references it.
    pub(crate) fn close_order(&self, ctx: &mut Context<'_>, kind: OrderKind, order: &Order) -> Result<()> {
        self.orders(kind).delete(ctx, &order.id)?;
        self.remove_buyer_order_index(ctx.storage, kind, &order.buyer, &order.id)?;
        self.remove_asset_order_index(ctx.storage, kind, order.asset_type, &order.asset_id, &order.id)
    }

    /// Match when `min_accept` equals the offer, counter when it is higher.
    ///
    /// Callers have already rejected `min_accept < offer`.
    pub(crate) fn settle_accept(
        &self,
        ctx: &mut Context<'_>,
        kind: OrderKind,
        mut order: Order,
        min_accept: Money,
        payee: &str,
        handover: Handover,
    ) -> Result<bool> {
        match min_accept.amount.cmp(&order.offer_price.amount) {
            Ordering::Less => unreachable!("min-accept is less than offer price"),
            Ordering::Equal => {
                if self.get_sell_order(ctx.storage, order.asset_type, &order.asset_id)?.is_some() {
                    return Err(DymnsError::precondition("must cancel the sell order first"));
                }
                self.escrow().withdraw(ctx.storage, payee, &order.offer_price)?;
                self.close_order(ctx, kind, &order)?;
                match handover {
                    Handover::DymName(dym_name) => {
                        self.transfer_dym_name_ownership(ctx, &dym_name, &order.buyer)?;
                    }
                    Handover::Alias { source, destination } => {
                        self.move_alias_to_rollapp(ctx, &source, &order.asset_id, &destination)?;
                    }
                }
                tracing::info!(
                    kind = %kind,
                    id = %order.id,
                    asset_id = %order.asset_id,
                    buyer = %order.buyer,
                    seller = payee,
                    price = %order.offer_price,
                    "order matched"
                );
                Ok(true)
            }
            Ordering::Greater => {
                order.counterparty_offer_price = Some(min_accept);
                self.orders(kind).set(ctx, &order)?;
                tracing::info!(kind = %kind, id = %order.id, "counter-offer recorded");
                Ok(false)
            }
        }
    }

    /// Accept checks common to both kinds, after ownership is established.
    pub(crate) fn check_accept_terms(order: &Order, owner: &str, min_accept: &Money) -> Result<()> {
        if order.buyer == owner {
            return Err(DymnsError::denied("cannot accept own offer"));
        }
        if min_accept.denom != order.offer_price.denom {
            return Err(DymnsError::DenomMismatch {
                expected: order.offer_price.denom.clone(),
                actual: min_accept.denom.clone(),
            });
        }
        if min_accept.amount < order.offer_price.amount {
            return Err(DymnsError::BelowOfferPrice {
                offer_price: order.offer_price.to_string(),
            });
        }
        Ok(())
    }

    /// Refund and remove an order on its buyer's request.
    pub(crate) fn cancel_order(&self, ctx: &mut Context<'_>, kind: OrderKind, order_id: &str, buyer: &str) -> Result<()> {
        let order = self
            .orders(kind)
            .get(ctx.storage, order_id)?
            .ok_or_else(|| DymnsError::OrderNotFound(order_id.to_string()))?;
        if order.buyer != buyer {
            return Err(DymnsError::denied("not the owner of the offer"));
        }
        self.escrow().withdraw(ctx.storage, &order.buyer, &order.offer_price)?;
        self.close_order(ctx, kind, &order)?;
        ctx.emit(order.event(kind, Action::Refunded));
        tracing::info!(kind = %kind, id = %order.id, refund = %order.offer_price, "order cancelled");
        Ok(())
    }

    // ------------------------------------------------------------------
    // buy orders
    // ------------------------------------------------------------------

    /// Place a new buy order, or raise one with `continue_order_id`.
    pub fn place_buy_order(&self, ctx: &mut Context<'_>, msg: &PlaceBuyOrder) -> Result<PlaceOrderResponse> {
        msg.validate_basic(self.codec())?;
        self.check_trading_enabled(msg.asset_type)?;

        match msg.asset_type {
            AssetType::DymName => {
                self.tradable_dym_name(ctx, &msg.asset_id, &msg.buyer)?;
            }
            AssetType::Alias => self.check_alias_purchase(ctx, msg)?,
        }
        self.check_offer_price(&msg.offer)?;

        let proposal = Order::new(
            msg.asset_id.clone(),
            msg.asset_type,
            msg.params.clone(),
            msg.buyer.clone(),
            msg.offer.clone(),
        );
        let order = match &msg.continue_order_id {
            Some(continue_id) => {
                let existing = self.order_to_raise(ctx, OrderKind::BuyOrder, continue_id, &proposal)?;
                self.raise_order(ctx, OrderKind::BuyOrder, existing, msg.offer.clone())?
            }
            None => self.open_order(ctx, OrderKind::BuyOrder, proposal)?,
        };

        Ok(PlaceOrderResponse { order_id: order.id })
    }

    fn check_alias_purchase(&self, ctx: &Context<'_>, msg: &PlaceBuyOrder) -> Result<()> {
        let destination = msg
            .params
            .first()
            .ok_or_else(|| DymnsError::invalid("missing destination RollApp"))?;
        if !self.rollapps().is_rollapp(destination) {
            return Err(DymnsError::invalid(format!(
                "destination RollApp does not exist: {destination}"
            )));
        }
        if !self.rollapps().is_creator(destination, &msg.buyer) {
            return Err(DymnsError::denied(format!("not the owner of the RollApp: {destination}")));
        }
        let source = self
            .rollapp_id_by_alias(&*ctx.storage, &msg.asset_id)?
            .ok_or_else(|| DymnsError::AliasNotFound(msg.asset_id.clone()))?;
        if &source == destination {
            return Err(DymnsError::invalid("destination RollApp is the same as the source"));
        }
        if self.rollapps().is_creator(&source, &msg.buyer) {
            return Err(DymnsError::invalid("cannot buy own alias"));
        }
        if self.is_alias_reserved(&msg.asset_id) {
            return Err(DymnsError::denied(format!(
                "prohibited to trade aliases reserved in params: {}",
                msg.asset_id
            )));
        }
        Ok(())
    }

    /// Accept a buy order (`min_accept == offer`) or counter it (`>`).
    pub fn accept_buy_order(&self, ctx: &mut Context<'_>, msg: &AcceptBuyOrder) -> Result<AcceptOrderResponse> {
        msg.validate_basic(self.codec())?;
        let order = self
            .buy_orders()
            .get(ctx.storage, &msg.order_id)?
            .ok_or_else(|| DymnsError::OrderNotFound(msg.order_id.clone()))?;
        self.check_trading_enabled(order.asset_type)?;

        let handover = match order.asset_type {
            AssetType::DymName => {
                let dym_name = self
                    .get_dym_name_with_expiration_check(ctx.storage, &order.asset_id, ctx.block_unix())?
                    .ok_or_else(|| DymnsError::DymNameNotFound(order.asset_id.clone()))?;
                if dym_name.owner != msg.owner {
                    return Err(DymnsError::denied("not the owner of the Dym-Name"));
                }
                Self::check_accept_terms(&order, &msg.owner, &msg.min_accept)?;
                Handover::DymName(dym_name)
            }
            AssetType::Alias => {
                if self.is_alias_reserved(&order.asset_id) {
                    return Err(DymnsError::denied(format!(
                        "prohibited to trade aliases reserved in params: {}",
                        order.asset_id
                    )));
                }
                let source = self
                    .rollapp_id_by_alias(ctx.storage, &order.asset_id)?
                    .ok_or_else(|| DymnsError::AliasNotFound(order.asset_id.clone()))?;
                if !self.rollapps().is_creator(&source, &msg.owner) {
                    return Err(DymnsError::denied("not the owner of the RollApp"));
                }
                Self::check_accept_terms(&order, &msg.owner, &msg.min_accept)?;
                let destination = order
                    .destination_rollapp()
                    .filter(|id| self.rollapps().is_rollapp(id))
                    .ok_or_else(|| {
                        DymnsError::invalid(format!(
                            "invalid destination RollApp ID: {}",
                            order.params.join(",")
                        ))
                    })?
                    .to_string();
                Handover::Alias { source, destination }
            }
        };

        let accepted = self.settle_accept(
            ctx,
            OrderKind::BuyOrder,
            order,
            msg.min_accept.clone(),
            &msg.owner,
            handover,
        )?;
        Ok(AcceptOrderResponse { accepted })
    }

    /// Cancel a buy order and refund its escrow.
    pub fn cancel_buy_order(&self, ctx: &mut Context<'_>, msg: &CancelBuyOrder) -> Result<()> {
        msg.validate_basic(self.codec())?;
        self.cancel_order(ctx, OrderKind::BuyOrder, &msg.order_id, &msg.buyer)
    }
}
