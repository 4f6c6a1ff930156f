//! Order storage: ID assignment and CRUD for both order kinds.

use dymns_escrow::BankKeeper;
use dymns_store::{keys, record, KeyCounter};
use dymns_types::{
    Action, AddressCodec, Context, DymnsError, Order, OrderKind, ParsedOrderId, Result, Storage,
};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

/// CRUD over the orders of one [`OrderKind`].
///
/// Records are keyed by the parsed ID, so a full scan lists Dym-Name orders
/// before Alias orders, each in numeric order.
#[derive(Clone, Copy)]
pub struct OrderRepository<'k> {
    kind: OrderKind,
    codec: &'k dyn AddressCodec,
}

impl<'k> OrderRepository<'k> {
    #[must_use]
    pub fn new(kind: OrderKind, codec: &'k dyn AddressCodec) -> Self {
        Self { kind, codec }
    }

    #[must_use]
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    fn counter(&self) -> KeyCounter {
        KeyCounter::new(keys::order_counter(self.kind))
    }

    fn key_of(&self, id: &str) -> Result<Vec<u8>> {
        Ok(keys::order(self.kind, self.kind.parse_id(id)?))
    }

    /// Highest sequence handed out so far.
    #[must_use]
    pub fn count(&self, storage: &dyn Storage) -> u64 {
        self.counter().get(storage)
    }

    /// Seed the sequence, e.g. when importing existing orders.
    pub fn set_count(&self, storage: &mut dyn Storage, value: u64) {
        self.counter().set(storage, value);
    }

    /// Reserve the next sequence number.
    ///
    /// # Panics
    /// Panics if the sequence is already at `u64::MAX`.
    pub fn next_id(&self, storage: &mut dyn Storage) -> u64 {
        self.counter().increment(storage)
    }

    /// Assign a fresh ID to `order` and persist it.
    ///
    /// # Errors
    /// - [`DymnsError::AlreadyExists`] if a record already sits at the minted ID
    /// - validation errors from [`Order::validate`]
    ///
    /// # Panics
    /// Panics if `order.id` is not empty.
    pub fn insert(&self, ctx: &mut Context<'_>, mut order: Order) -> Result<Order> {
        assert!(order.id.is_empty(), "order id must be empty before insert: {}", order.id);

        // the counter only advances once the order is known to be storable
        let sequence = self
            .count(ctx.storage)
            .checked_add(1)
            .unwrap_or_else(|| panic!("{} counter overflow", self.kind));
        let id = self.kind.format_id(order.asset_type, sequence);
        let key = keys::order(
            self.kind,
            ParsedOrderId {
                asset_type: order.asset_type,
                sequence,
            },
        );
        if ctx.storage.read(&key).is_some() {
            return Err(DymnsError::AlreadyExists {
                what: format!("{} ID: {id}", self.kind),
            });
        }

        order.id = id;
        order.validate(self.kind, self.codec)?;
        record::save(ctx.storage, &key, &order)?;
        self.set_count(ctx.storage, sequence);
        ctx.emit(order.event(self.kind, Action::Created));
        tracing::info!(
            kind = %self.kind,
            id = %order.id,
            asset_id = %order.asset_id,
            buyer = %order.buyer,
            offer_price = %order.offer_price,
            "order created"
        );
        Ok(order)
    }

    /// Overwrite an existing order.
    pub fn set(&self, ctx: &mut Context<'_>, order: &Order) -> Result<()> {
        order.validate(self.kind, self.codec)?;
        let key = self.key_of(&order.id)?;
        record::save(ctx.storage, &key, order)?;
        ctx.emit(order.event(self.kind, Action::Set));
        tracing::debug!(kind = %self.kind, id = %order.id, offer_price = %order.offer_price, "order updated");
        Ok(())
    }

    /// # Errors
    /// [`DymnsError::InvalidOrderId`] if `id` is malformed for this kind.
    pub fn get(&self, storage: &dyn Storage, id: &str) -> Result<Option<Order>> {
        record::load(storage, &self.key_of(id)?)
    }

    /// Delete the order. Absent orders are a silent no-op.
    pub fn delete(&self, ctx: &mut Context<'_>, id: &str) -> Result<()> {
        let key = self.key_of(id)?;
        let Some(order) = record::load::<Order>(ctx.storage, &key)? else {
            return Ok(());
        };
        ctx.storage.remove(&key);
        ctx.emit(order.event(self.kind, Action::Deleted));
        tracing::debug!(kind = %self.kind, id, "order deleted");
        Ok(())
    }

    /// Every order of this kind, in key order.
    pub fn list_all(&self, storage: &dyn Storage) -> Result<Vec<Order>> {
        record::load_all(storage, &keys::orders_prefix(self.kind))
    }
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    #[must_use]
    pub fn orders(&self, kind: OrderKind) -> OrderRepository<'_> {
        OrderRepository::new(kind, self.codec())
    }

    #[must_use]
    pub fn buy_orders(&self) -> OrderRepository<'_> {
        self.orders(OrderKind::BuyOrder)
    }

    #[must_use]
    pub fn offers_to_buy(&self) -> OrderRepository<'_> {
        self.orders(OrderKind::OfferToBuy)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use dymns_types::{dummy, event, EventLog, HexAddressCodec, MemStorage};
    use rust_decimal::Decimal;

    use super::*;

    const BUY_ORDERS: OrderRepository<'static> = OrderRepository {
        kind: OrderKind::BuyOrder,
        codec: &HexAddressCodec,
    };

    const OFFERS: OrderRepository<'static> = OrderRepository {
        kind: OrderKind::OfferToBuy,
        codec: &HexAddressCodec,
    };

    fn with_ctx<T>(
        store: &mut MemStorage,
        log: &mut EventLog,
        f: impl FnOnce(&mut Context<'_>) -> T,
    ) -> T {
        let mut ctx = Context::new(store, log, Utc.timestamp_opt(1_000, 0).unwrap());
        f(&mut ctx)
    }

    fn name_order(name: &str, price: i64) -> Order {
        Order::dummy_for_name(name, &dummy::address(1), Decimal::new(price, 0))
    }

    #[test]
    fn insert_assigns_prefixed_ids_per_asset_type() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            let a = BUY_ORDERS.insert(ctx, name_order("a", 100)).unwrap();
            let b = BUY_ORDERS
                .insert(
                    ctx,
                    Order::dummy_for_alias("nim", "mars_1123-1", &dummy::address(1), Decimal::ONE),
                )
                .unwrap();
            let c = BUY_ORDERS.insert(ctx, name_order("c", 100)).unwrap();
            assert_eq!((a.id.as_str(), b.id.as_str(), c.id.as_str()), ("101", "202", "103"));
        });

        assert_eq!(BUY_ORDERS.count(&store), 3);
        assert_eq!(log.with_action(event::EVENT_TYPE_BUY_ORDER, Action::Created).count(), 3);
    }

    #[test]
    fn list_all_is_names_first_then_numeric() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            BUY_ORDERS.set_count(ctx.storage, 8);
            for _ in 0..3 {
                BUY_ORDERS.insert(ctx, name_order("a", 1)).unwrap();
            }
            BUY_ORDERS
                .insert(
                    ctx,
                    Order::dummy_for_alias("nim", "mars_1123-1", &dummy::address(1), Decimal::ONE),
                )
                .unwrap();
            BUY_ORDERS.insert(ctx, name_order("b", 1)).unwrap();
        });

        let ids: Vec<String> = BUY_ORDERS.list_all(&store).unwrap().into_iter().map(|o| o.id).collect();
        // 1010 sorts after 109 numerically, not lexicographically
        assert_eq!(ids, ["109", "1010", "1011", "1013", "2012"]);
    }

    #[test]
    fn insert_refuses_to_overwrite() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            let first = BUY_ORDERS.insert(ctx, name_order("a", 1)).unwrap();
            BUY_ORDERS.set_count(ctx.storage, 0);
            let err = BUY_ORDERS.insert(ctx, name_order("b", 2)).unwrap_err();
            assert!(matches!(err, DymnsError::AlreadyExists { .. }));
            assert_eq!(BUY_ORDERS.get(ctx.storage, "101").unwrap(), Some(first));
            assert_eq!(BUY_ORDERS.count(ctx.storage), 0);
        });
    }

    #[test]
    #[should_panic(expected = "order id must be empty")]
    fn insert_with_id_panics() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            let mut order = name_order("a", 1);
            order.id = "101".into();
            let _ = BUY_ORDERS.insert(ctx, order);
        });
    }

    #[test]
    fn insert_validates() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            let mut bad = name_order("a", 1);
            bad.buyer = "nobody".into();
            assert!(BUY_ORDERS.insert(ctx, bad).is_err());
            assert_eq!(BUY_ORDERS.count(ctx.storage), 0);
            let order = BUY_ORDERS.insert(ctx, name_order("a", 1)).unwrap();
            assert_eq!(order.id, "101");
        });
    }

    #[test]
    fn set_get_delete() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            let mut order = OFFERS.insert(ctx, name_order("a", 100)).unwrap();
            assert_eq!(order.id, "1");

            order.counterparty_offer_price = Some(order.offer_price.clone());
            OFFERS.set(ctx, &order).unwrap();
            assert_eq!(OFFERS.get(ctx.storage, "1").unwrap(), Some(order));

            OFFERS.delete(ctx, "1").unwrap();
            assert_eq!(OFFERS.get(ctx.storage, "1").unwrap(), None);
            // second delete is a silent no-op
            OFFERS.delete(ctx, "1").unwrap();
            assert!(OFFERS.get(ctx.storage, "x").is_err());
        });

        assert_eq!(log.with_action(event::EVENT_TYPE_OFFER_TO_BUY, Action::Deleted).count(), 1);
        assert_eq!(log.with_action(event::EVENT_TYPE_OFFER_TO_BUY, Action::Set).count(), 1);
    }

    #[test]
    fn kinds_do_not_share_storage() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        with_ctx(&mut store, &mut log, |ctx| {
            BUY_ORDERS.insert(ctx, name_order("a", 1)).unwrap();
            OFFERS.insert(ctx, name_order("a", 1)).unwrap();
        });
        assert_eq!(BUY_ORDERS.list_all(&store).unwrap().len(), 1);
        assert_eq!(OFFERS.list_all(&store).unwrap().len(), 1);
        assert_eq!(OFFERS.count(&store), 1);
    }

    #[test]
    #[should_panic(expected = "counter overflow")]
    fn next_id_overflow_panics() {
        let mut store = MemStorage::new();
        BUY_ORDERS.set_count(&mut store, u64::MAX - 1);
        assert_eq!(BUY_ORDERS.next_id(&mut store), u64::MAX);
        BUY_ORDERS.next_id(&mut store);
    }

    #[test]
    #[should_panic(expected = "counter overflow")]
    fn insert_past_max_sequence_panics() {
        let mut store = MemStorage::new();
        let mut log = EventLog::new();
        BUY_ORDERS.set_count(&mut store, u64::MAX);
        with_ctx(&mut store, &mut log, |ctx| {
            let _ = BUY_ORDERS.insert(ctx, name_order("a", 1));
        });
    }
}
