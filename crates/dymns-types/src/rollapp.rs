//! Rollapps as seen by the marketplace: an id and the account that created it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollApp {
    pub rollapp_id: String,
    /// Creator account; the only one allowed to trade the rollapp's aliases.
    pub owner: String,
}

impl RollApp {
    #[must_use]
    pub fn new(rollapp_id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            rollapp_id: rollapp_id.into(),
            owner: owner.into(),
        }
    }
}
