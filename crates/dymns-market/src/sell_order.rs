//! Sell-order markers.
//!
//! Only existence matters here: while a sell order is open for an asset, buy
//! orders for it cannot be matched.

use dymns_escrow::BankKeeper;
use dymns_store::{keys, record};
use dymns_types::{Action, AddressCodec, AssetType, Context, DymnsError, Result, SellOrder, Storage};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    pub fn set_sell_order(&self, ctx: &mut Context<'_>, sell_order: &SellOrder) -> Result<()> {
        if !sell_order.asset_type.is_valid_asset_id(&sell_order.asset_id) {
            return Err(DymnsError::InvalidAssetId {
                asset_type: sell_order.asset_type,
                asset_id: sell_order.asset_id.clone(),
            });
        }
        if !sell_order.min_price.is_valid() || !sell_order.min_price.is_positive() {
            return Err(DymnsError::invalid(format!(
                "sell order min price must be positive: {}",
                sell_order.min_price
            )));
        }
        let key = keys::sell_order(sell_order.asset_type, &sell_order.asset_id);
        record::save(ctx.storage, &key, sell_order)?;
        ctx.emit(sell_order.event(Action::Set));
        Ok(())
    }

    pub fn get_sell_order(
        &self,
        storage: &dyn Storage,
        asset_type: AssetType,
        asset_id: &str,
    ) -> Result<Option<SellOrder>> {
        record::load(storage, &keys::sell_order(asset_type, asset_id))
    }

    /// Remove the marker. Absent markers are a silent no-op.
    pub fn delete_sell_order(&self, ctx: &mut Context<'_>, asset_type: AssetType, asset_id: &str) -> Result<()> {
        let key = keys::sell_order(asset_type, asset_id);
        let Some(sell_order) = record::load::<SellOrder>(ctx.storage, &key)? else {
            return Ok(());
        };
        ctx.storage.remove(&key);
        ctx.emit(sell_order.event(Action::Deleted));
        Ok(())
    }
}
