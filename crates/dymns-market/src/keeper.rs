//! The [`Keeper`]: collaborators, params, and the transaction boundary.

use chrono::{DateTime, Utc};
use dymns_escrow::{Bank, BankKeeper, EscrowLedger};
use dymns_store::{buffer, StoreBuffer};
use dymns_types::{
    AddressCodec, Context, EventLog, EventSink, HexAddressCodec, Params, Result, Storage,
};

use crate::rollapp::{RollAppKeeper, StaticRollApps};

/// Owner of all marketplace state transitions.
///
/// The keeper holds no state of its own beyond params: every record lives in
/// the [`Storage`] handed in through the [`Context`]. Collaborators are
/// injected so hosts can supply their own bank, rollapp registry and address
/// format.
#[derive(Debug, Clone)]
pub struct Keeper<B = Bank, R = StaticRollApps, A = HexAddressCodec> {
    params: Params,
    bank: B,
    rollapps: R,
    codec: A,
}

impl Keeper {
    /// Default params, in-memory bank and hex addresses.
    #[must_use]
    pub fn with_rollapps(rollapps: StaticRollApps) -> Self {
        Self {
            params: Params::default(),
            bank: Bank::new(),
            rollapps,
            codec: HexAddressCodec,
        }
    }
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    /// # Errors
    /// Returns [`dymns_types::DymnsError::Configuration`] if `params` are invalid.
    pub fn new(params: Params, bank: B, rollapps: R, codec: A) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            bank,
            rollapps,
            codec,
        })
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replace params after validating them.
    pub fn set_params(&mut self, params: Params) -> Result<()> {
        params.validate()?;
        tracing::info!(
            price_denom = %params.price.price_denom,
            min_offer_price = %params.price.min_offer_price,
            "params updated"
        );
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn bank(&self) -> &B {
        &self.bank
    }

    #[must_use]
    pub fn rollapps(&self) -> &R {
        &self.rollapps
    }

    #[must_use]
    pub fn codec(&self) -> &A {
        &self.codec
    }

    #[must_use]
    pub fn escrow(&self) -> EscrowLedger<'_, B> {
        EscrowLedger::new(&self.bank)
    }

    /// Run `op` as one all-or-nothing transaction.
    ///
    /// Writes go to a [`StoreBuffer`] over `storage` and events to a local
    /// log. On `Ok` the buffer is applied to `storage` and the events are
    /// forwarded to `events`; on `Err` both are dropped. Panics inside `op`
    /// propagate and also leave `storage` untouched.
    pub fn execute<T, F>(
        &self,
        storage: &mut dyn Storage,
        events: &mut dyn EventSink,
        block_time: DateTime<Utc>,
        op: F,
    ) -> Result<T>
    where
        F: FnOnce(&Self, &mut Context<'_>) -> Result<T>,
    {
        let mut log = EventLog::new();
        let (result, batch) = {
            let mut buffer = StoreBuffer::new(&*storage);
            let result = {
                let mut ctx = Context::new(&mut buffer, &mut log, block_time);
                op(self, &mut ctx)
            };
            (result, buffer.into_batch())
        };

        match result {
            Ok(value) => {
                tracing::debug!(writes = batch.len(), events = log.len(), "transaction committed");
                buffer::apply(storage, batch);
                for event in log.take() {
                    events.emit(event);
                }
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    kind = %err.kind(),
                    discarded_writes = batch.len(),
                    "transaction rolled back"
                );
                Err(err)
            }
        }
    }
}
