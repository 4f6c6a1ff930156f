//! Dym-Name records and the address sets derived from them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    constants, event, is_valid_chain_id, is_valid_dym_name, is_valid_sub_dym_name, AddressCodec,
    DymnsError, Event, Result,
};

/// One resolution entry of a Dym-Name.
///
/// An empty `chain_id` means the host chain; an empty `path` means the name
/// itself rather than a sub-name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DymNameConfig {
    pub chain_id: String,
    pub path: String,
    pub value: String,
}

impl DymNameConfig {
    /// The config that resolves the bare name on the host chain.
    #[must_use]
    pub fn is_default_name_config(&self) -> bool {
        self.chain_id.is_empty() && self.path.is_empty()
    }

    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}|{}", self.chain_id, self.path)
    }

    pub fn validate(&self, codec: &dyn AddressCodec) -> Result<()> {
        if !self.chain_id.is_empty() && !is_valid_chain_id(&self.chain_id) {
            return Err(DymnsError::invalid(format!(
                "config chain id is not well-formed: {}",
                self.chain_id
            )));
        }
        if !self.path.is_empty() && !is_valid_sub_dym_name(&self.path) {
            return Err(DymnsError::invalid(format!(
                "config path must be a valid sub-name: {}",
                self.path
            )));
        }
        if self.value != self.value.to_lowercase() {
            return Err(DymnsError::invalid("config value must be lowercase"));
        }
        if self.chain_id.is_empty() && !self.value.is_empty() {
            codec.decode(&self.value)?;
        }
        Ok(())
    }
}

/// A registered name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DymName {
    pub name: String,
    pub owner: String,
    pub controller: String,
    /// Unix seconds.
    pub expire_at: i64,
    pub configs: Vec<DymNameConfig>,
    pub contact: String,
}

impl DymName {
    #[must_use]
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expire_at < now_unix
    }

    /// Trading stops `prohibit_sell_duration_secs` before expiry.
    #[must_use]
    pub fn is_prohibited_trading_at(&self, anchor_unix: i64, prohibit_sell_duration_secs: i64) -> bool {
        self.expire_at.saturating_sub(prohibit_sell_duration_secs) < anchor_unix
    }

    pub fn validate(&self, codec: &dyn AddressCodec) -> Result<()> {
        if !is_valid_dym_name(&self.name) {
            return Err(DymnsError::InvalidAssetId {
                asset_type: crate::AssetType::DymName,
                asset_id: self.name.clone(),
            });
        }
        codec.decode(&self.owner)?;
        codec.decode(&self.controller)?;
        if self.expire_at == 0 {
            return Err(DymnsError::invalid("expiry is empty"));
        }
        let mut seen = BTreeSet::new();
        for config in &self.configs {
            config.validate(codec)?;
            if !seen.insert(config.identity()) {
                return Err(DymnsError::invalid(format!(
                    "config is not unique: {}",
                    config.identity()
                )));
            }
        }
        if self.contact.len() > constants::MAX_DYM_NAME_CONTACT_LENGTH {
            return Err(DymnsError::invalid(format!(
                "contact too long: {} > {}",
                self.contact.len(),
                constants::MAX_DYM_NAME_CONTACT_LENGTH
            )));
        }
        Ok(())
    }

    /// The address the bare name resolves to on the host chain: the default
    /// config's value, or the owner when that is missing or empty.
    #[must_use]
    pub fn default_address(&self) -> &str {
        self.configs
            .iter()
            .find(|c| c.is_default_name_config() && !c.value.is_empty())
            .map_or(self.owner.as_str(), |c| c.value.as_str())
    }

    /// Addresses under which this name is reverse-indexed.
    ///
    /// Configured addresses are every non-empty config value plus the default
    /// address. The fallback address is the raw bytes of the default address.
    pub fn addresses_for_reverse_mapping(
        &self,
        codec: &dyn AddressCodec,
    ) -> Result<(BTreeSet<String>, BTreeSet<Vec<u8>>)> {
        let mut configured: BTreeSet<String> = self
            .configs
            .iter()
            .filter(|c| !c.value.is_empty())
            .map(|c| c.value.clone())
            .collect();
        let default_address = self.default_address();
        configured.insert(default_address.to_string());

        let mut fallback = BTreeSet::new();
        fallback.insert(codec.decode(default_address)?);
        Ok((configured, fallback))
    }

    #[must_use]
    pub fn event(&self) -> Event {
        Event::new(event::EVENT_TYPE_SET_DYM_NAME)
            .attr("name", &self.name)
            .attr("owner", &self.owner)
            .attr("controller", &self.controller)
            .attr("expiry_epoch", self.expire_at.to_string())
            .attr("config_count", self.configs.len().to_string())
            .attr("has_contact_details", (!self.contact.is_empty()).to_string())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl DymName {
    /// A name owned and controlled by `owner`, no configs.
    pub fn dummy(name: &str, owner: &str, expire_at: i64) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            controller: owner.to_string(),
            expire_at,
            configs: Vec::new(),
            contact: String::new(),
        }
    }
}
