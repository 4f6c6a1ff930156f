//! Shared fixture: a keeper over an in-memory store with two rollapps.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use dymns_escrow::BankKeeper;
use dymns_market::{
    AcceptBuyOrder, AcceptOfferToBuy, CancelBuyOrder, CancelOfferToBuy, Keeper, PlaceBuyOrder,
    PlaceOfferToBuy, StaticRollApps,
};
use dymns_types::{
    dummy, AssetType, Context, DymName, EventLog, MemStorage, Money, Params, Result, RollApp,
};
use rust_decimal::Decimal;

pub const NOW: i64 = 1_700_000_000;
pub const YEAR: i64 = 365 * 24 * 60 * 60;
pub const DENOM: &str = "adym";

pub const NIM: &str = "nim_1122-1";
pub const MARS: &str = "mars_1123-1";
/// Second rollapp of the [`NIM`] creator.
pub const VENUS: &str = "venus_1124-1";

pub fn adym(n: i64) -> Money {
    Money::new(DENOM, Decimal::new(n, 0))
}

pub fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

pub fn owner() -> String {
    dummy::address(1)
}

pub fn buyer() -> String {
    dummy::address(2)
}

pub fn other_buyer() -> String {
    dummy::address(3)
}

/// Creator of [`NIM`].
pub fn nim_creator() -> String {
    dummy::address(10)
}

/// Creator of [`MARS`].
pub fn mars_creator() -> String {
    dummy::address(11)
}

pub struct Market {
    pub keeper: Keeper,
    pub store: MemStorage,
    pub events: EventLog,
    pub now: i64,
}

impl Market {
    /// Min offer 1 adym, everything else default.
    pub fn new() -> Self {
        let rollapps = StaticRollApps::new()
            .with(RollApp::new(NIM, nim_creator()))
            .with(RollApp::new(MARS, mars_creator()))
            .with(RollApp::new(VENUS, nim_creator()));
        let mut keeper = Keeper::with_rollapps(rollapps);
        let mut params = Params::default();
        params.price.min_offer_price = Decimal::ONE;
        keeper.set_params(params).unwrap();
        Self {
            keeper,
            store: MemStorage::new(),
            events: EventLog::new(),
            now: NOW,
        }
    }

    pub fn run<T>(&mut self, op: impl FnOnce(&Keeper, &mut Context<'_>) -> Result<T>) -> Result<T> {
        let block_time = Utc.timestamp_opt(self.now, 0).unwrap();
        self.keeper.execute(&mut self.store, &mut self.events, block_time, op)
    }

    pub fn fund(&mut self, account: &str, amount: i64) {
        self.keeper.bank().mint(&mut self.store, account, &adym(amount)).unwrap();
    }

    pub fn balance(&self, account: &str) -> Decimal {
        self.keeper.bank().balance(&self.store, account, DENOM).unwrap()
    }

    pub fn escrowed(&self) -> Decimal {
        self.keeper.escrow().held(&self.store, DENOM).unwrap()
    }

    pub fn register(&mut self, name: &str, owner: &str) {
        let dym_name = DymName::dummy(name, owner, NOW + YEAR);
        self.run(|k, ctx| k.register_dym_name(ctx, &dym_name)).unwrap();
    }

    pub fn link_alias(&mut self, rollapp_id: &str, alias: &str) {
        self.run(|k, ctx| k.set_alias_for_rollapp(ctx, rollapp_id, alias)).unwrap();
    }

    pub fn place_for_name(&mut self, name: &str, buyer: &str, price: i64, continue_id: Option<&str>) -> Result<String> {
        let msg = PlaceBuyOrder {
            asset_id: name.to_string(),
            asset_type: AssetType::DymName,
            params: Vec::new(),
            buyer: buyer.to_string(),
            continue_order_id: continue_id.map(str::to_string),
            offer: adym(price),
        };
        self.run(|k, ctx| k.place_buy_order(ctx, &msg)).map(|r| r.order_id)
    }

    pub fn place_for_alias(
        &mut self,
        alias: &str,
        destination: &str,
        buyer: &str,
        price: i64,
        continue_id: Option<&str>,
    ) -> Result<String> {
        let msg = PlaceBuyOrder {
            asset_id: alias.to_string(),
            asset_type: AssetType::Alias,
            params: vec![destination.to_string()],
            buyer: buyer.to_string(),
            continue_order_id: continue_id.map(str::to_string),
            offer: adym(price),
        };
        self.run(|k, ctx| k.place_buy_order(ctx, &msg)).map(|r| r.order_id)
    }

    pub fn accept(&mut self, order_id: &str, owner: &str, min_accept: i64) -> Result<bool> {
        let msg = AcceptBuyOrder {
            order_id: order_id.to_string(),
            owner: owner.to_string(),
            min_accept: adym(min_accept),
        };
        self.run(|k, ctx| k.accept_buy_order(ctx, &msg)).map(|r| r.accepted)
    }

    pub fn cancel(&mut self, order_id: &str, buyer: &str) -> Result<()> {
        let msg = CancelBuyOrder {
            order_id: order_id.to_string(),
            buyer: buyer.to_string(),
        };
        self.run(|k, ctx| k.cancel_buy_order(ctx, &msg))
    }

    pub fn place_offer(&mut self, name: &str, buyer: &str, price: i64, continue_id: Option<&str>) -> Result<String> {
        let msg = PlaceOfferToBuy {
            name: name.to_string(),
            buyer: buyer.to_string(),
            continue_offer_id: continue_id.map(str::to_string),
            offer: adym(price),
        };
        self.run(|k, ctx| k.place_offer_to_buy(ctx, &msg)).map(|r| r.order_id)
    }

    pub fn accept_offer(&mut self, offer_id: &str, owner: &str, min_accept: i64) -> Result<bool> {
        let msg = AcceptOfferToBuy {
            offer_id: offer_id.to_string(),
            owner: owner.to_string(),
            min_accept: adym(min_accept),
        };
        self.run(|k, ctx| k.accept_offer_to_buy(ctx, &msg)).map(|r| r.accepted)
    }

    pub fn cancel_offer(&mut self, offer_id: &str, buyer: &str) -> Result<()> {
        let msg = CancelOfferToBuy {
            offer_id: offer_id.to_string(),
            buyer: buyer.to_string(),
        };
        self.run(|k, ctx| k.cancel_offer_to_buy(ctx, &msg))
    }
}
