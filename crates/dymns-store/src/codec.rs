//! Encodings for reverse-index records.
//!
//! Each flavor wraps the ID list in its own named JSON record so a value read
//! from the wrong namespace fails to decode instead of silently yielding IDs
//! of the wrong kind.

use dymns_types::Result;
use serde::{Deserialize, Serialize};

/// Encoding scheme for a reverse-index record.
pub trait IndexCodec {
    fn encode(ids: &[String]) -> Result<Vec<u8>>;

    fn decode(bytes: &[u8]) -> Result<Vec<String>>;
}

/// Order IDs (buy orders or offers-to-buy).
pub struct OrderIds;

/// Dym-Names.
pub struct DymNames;

/// Aliases.
pub struct Aliases;

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct OrderIdsRecord {
    order_ids: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DymNamesRecord {
    dym_names: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasesRecord {
    aliases: Vec<String>,
}

impl IndexCodec for OrderIds {
    fn encode(ids: &[String]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&OrderIdsRecord {
            order_ids: ids.to_vec(),
        })?)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<String>> {
        Ok(serde_json::from_slice::<OrderIdsRecord>(bytes)?.order_ids)
    }
}

impl IndexCodec for DymNames {
    fn encode(ids: &[String]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&DymNamesRecord {
            dym_names: ids.to_vec(),
        })?)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<String>> {
        Ok(serde_json::from_slice::<DymNamesRecord>(bytes)?.dym_names)
    }
}

impl IndexCodec for Aliases {
    fn encode(ids: &[String]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&AliasesRecord {
            aliases: ids.to_vec(),
        })?)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<String>> {
        Ok(serde_json::from_slice::<AliasesRecord>(bytes)?.aliases)
    }
}
