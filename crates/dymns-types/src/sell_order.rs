//! Sell orders, tracked only as a marker that blocks buy-order acceptance.

use serde::{Deserialize, Serialize};

use crate::{event, Action, AssetType, Event, Money};

/// An owner's open listing of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrder {
    pub asset_id: String,
    pub asset_type: AssetType,
    /// Unix seconds.
    pub expire_at: i64,
    pub min_price: Money,
    pub sell_price: Option<Money>,
}

impl SellOrder {
    #[must_use]
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expire_at < now_unix
    }

    #[must_use]
    pub fn event(&self, action: Action) -> Event {
        let sell_price = self
            .sell_price
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        Event::new(event::EVENT_TYPE_SELL_ORDER)
            .attr("asset_id", &self.asset_id)
            .attr("asset_type", self.asset_type.to_string())
            .attr("expiry_epoch", self.expire_at.to_string())
            .attr("min_price", self.min_price.to_string())
            .attr("sell_price", sell_price)
            .attr("action", action.as_str())
    }
}
