//! Tradable asset kinds and the syntax rules for their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants;

/// The kind of asset an order is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetType {
    DymName,
    Alias,
}

impl AssetType {
    /// Partition byte used in store keys. Name orders sort before alias orders.
    #[must_use]
    pub const fn store_byte(self) -> u8 {
        match self {
            Self::DymName => 1,
            Self::Alias => 2,
        }
    }

    /// Prefix of buy-order IDs placed against this asset type.
    #[must_use]
    pub const fn buy_order_id_prefix(self) -> &'static str {
        match self {
            Self::DymName => constants::BUY_ORDER_ID_PREFIX_DYM_NAME,
            Self::Alias => constants::BUY_ORDER_ID_PREFIX_ALIAS,
        }
    }

    /// Reverse of [`AssetType::buy_order_id_prefix`].
    #[must_use]
    pub fn from_buy_order_id_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            constants::BUY_ORDER_ID_PREFIX_DYM_NAME => Some(Self::DymName),
            constants::BUY_ORDER_ID_PREFIX_ALIAS => Some(Self::Alias),
            _ => None,
        }
    }

    /// Whether `asset_id` is syntactically valid for this asset type.
    #[must_use]
    pub fn is_valid_asset_id(self, asset_id: &str) -> bool {
        match self {
            Self::DymName => is_valid_dym_name(asset_id),
            Self::Alias => is_valid_alias(asset_id),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DymName => write!(f, "Dym-Name"),
            Self::Alias => write!(f, "Alias"),
        }
    }
}

fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// 1–20 chars of `a-z0-9`, with single `-` or `_` separators that are neither
/// leading, trailing, nor consecutive.
#[must_use]
pub fn is_valid_dym_name(name: &str) -> bool {
    if name.is_empty() || name.len() > constants::MAX_DYM_NAME_LENGTH {
        return false;
    }
    let mut prev_separator = true; // rejects a leading separator
    for c in name.chars() {
        if is_separator(c) {
            if prev_separator {
                return false;
            }
            prev_separator = true;
        } else if is_lower_alnum(c) {
            prev_separator = false;
        } else {
            return false;
        }
    }
    !prev_separator
}

/// Dot-separated Dym-Names, e.g. `"a.b-c"`.
#[must_use]
pub fn is_valid_sub_dym_name(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(is_valid_dym_name)
}

/// 1–10 chars of `a-z0-9`.
#[must_use]
pub fn is_valid_alias(alias: &str) -> bool {
    !alias.is_empty()
        && alias.len() <= constants::MAX_ALIAS_LENGTH
        && alias.chars().all(is_lower_alnum)
}

/// Loose chain-id syntax: 3–48 chars of `a-z0-9-_`, alphanumeric at both ends.
#[must_use]
pub fn is_valid_chain_id(chain_id: &str) -> bool {
    let len = chain_id.len();
    if !(3..=constants::MAX_CHAIN_ID_LENGTH).contains(&len) {
        return false;
    }
    let first_last_ok = chain_id.starts_with(is_lower_alnum) && chain_id.ends_with(is_lower_alnum);
    first_last_ok && chain_id.chars().all(|c| is_lower_alnum(c) || is_separator(c))
}

/// Strict rollapp id syntax: `{name}_{eip155}-{epoch}`, e.g. `"nim_1122-1"`.
#[must_use]
pub fn is_valid_rollapp_id(rollapp_id: &str) -> bool {
    if !is_valid_chain_id(rollapp_id) {
        return false;
    }
    let Some((name, numbers)) = rollapp_id.rsplit_once('_') else {
        return false;
    };
    let Some((eip155, epoch)) = numbers.split_once('-') else {
        return false;
    };
    let name_ok = name.starts_with(|c: char| c.is_ascii_lowercase()) && name.chars().all(is_lower_alnum);
    let positive = |s: &str| {
        s.chars().all(|c| c.is_ascii_digit()) && s.parse::<u64>().is_ok_and(|n| n > 0)
    };
    name_ok && positive(eip155) && positive(epoch)
}
