//! Module parameters.
//!
//! Params are plain serde structs so a host can load them from JSON with
//! [`Params::from_json`]. [`Params::validate`] is run on load and should be
//! run by anyone constructing params by hand.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, is_valid_alias, is_valid_chain_id, AssetType, DymnsError, Result};

/// All module parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub price: PriceParams,
    pub chains: ChainsParams,
    pub misc: MiscParams,
}

impl Params {
    /// Parse and validate params from JSON.
    ///
    /// # Errors
    /// Returns [`DymnsError::Configuration`] if the JSON is malformed or the
    /// values fail [`Params::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| DymnsError::Configuration(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        self.price
            .validate()
            .map_err(|e| DymnsError::Configuration(format!("price params: {e}")))?;
        self.chains
            .validate()
            .map_err(|e| DymnsError::Configuration(format!("chains params: {e}")))?;
        self.misc
            .validate()
            .map_err(|e| DymnsError::Configuration(format!("misc params: {e}")))
    }
}

/// Pricing rules for offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceParams {
    /// The only denomination offers may be made in.
    pub price_denom: String,
    /// Minimum amount of a new offer.
    pub min_offer_price: Decimal,
}

impl Default for PriceParams {
    fn default() -> Self {
        Self {
            price_denom: constants::DEFAULT_PRICE_DENOM.to_string(),
            min_offer_price: Decimal::from(constants::DEFAULT_MIN_OFFER_PRICE),
        }
    }
}

impl PriceParams {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.price_denom.is_empty() {
            return Err("price denom cannot be empty".into());
        }
        if !self
            .price_denom
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
        {
            return Err(format!("invalid price denom: {}", self.price_denom));
        }
        if self.min_offer_price < Decimal::ONE {
            return Err(format!(
                "min offer price must be at least 1{}",
                self.price_denom
            ));
        }
        Ok(())
    }
}

/// Aliases reserved for well-known chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasesOfChainId {
    pub chain_id: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainsParams {
    pub aliases_of_chain_ids: Vec<AliasesOfChainId>,
}

impl Default for ChainsParams {
    fn default() -> Self {
        let entry = |chain_id: &str, aliases: &[&str]| AliasesOfChainId {
            chain_id: chain_id.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        };
        Self {
            aliases_of_chain_ids: vec![
                entry("dymension_1100-1", &["dym", "dymension"]),
                entry("cosmoshub-4", &["cosmos", "cosmoshub"]),
                entry("osmosis-1", &["osmosis"]),
                entry("bitcoin", &["btc"]),
                entry("ethereum", &["eth", "ether"]),
            ],
        }
    }
}

impl ChainsParams {
    /// Whether `alias` is reserved in params, either as an alias or as a
    /// chain id, and so cannot be traded.
    #[must_use]
    pub fn is_reserved_alias(&self, alias: &str) -> bool {
        self.aliases_of_chain_ids
            .iter()
            .any(|record| record.chain_id == alias || record.aliases.iter().any(|a| a == alias))
    }

    fn validate(&self) -> std::result::Result<(), String> {
        // chain ids and aliases share one namespace
        let mut unique = HashSet::new();
        for record in &self.aliases_of_chain_ids {
            if !is_valid_chain_id(&record.chain_id) {
                return Err(format!("chain ID is not well-formed: {}", record.chain_id));
            }
            if !unique.insert(record.chain_id.as_str()) {
                return Err(format!(
                    "chain ID and alias must be unique among all, found duplicated: {}",
                    record.chain_id
                ));
            }
            for alias in &record.aliases {
                if !is_valid_alias(alias) {
                    return Err(format!("alias is not well-formed: {alias}"));
                }
                if !unique.insert(alias.as_str()) {
                    return Err(format!(
                        "chain ID and alias must be unique among all, found duplicated: {alias}"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Feature switches and durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscParams {
    pub enable_trading_name: bool,
    pub enable_trading_alias: bool,
    /// Window before a Dym-Name's expiry in which it cannot be traded.
    pub prohibit_sell_duration_secs: i64,
    pub grace_period_secs: i64,
}

impl Default for MiscParams {
    fn default() -> Self {
        Self {
            enable_trading_name: true,
            enable_trading_alias: true,
            prohibit_sell_duration_secs: constants::DEFAULT_PROHIBIT_SELL_DURATION_SECS,
            grace_period_secs: constants::DEFAULT_GRACE_PERIOD_SECS,
        }
    }
}

impl MiscParams {
    #[must_use]
    pub fn trading_enabled(&self, asset_type: AssetType) -> bool {
        match asset_type {
            AssetType::DymName => self.enable_trading_name,
            AssetType::Alias => self.enable_trading_alias,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.prohibit_sell_duration_secs <= 0 {
            return Err("prohibit sell duration cannot be zero".into());
        }
        if self.grace_period_secs < constants::MIN_GRACE_PERIOD_SECS {
            return Err(format!(
                "grace period duration cannot be less than {}s",
                constants::MIN_GRACE_PERIOD_SECS
            ));
        }
        Ok(())
    }
}
