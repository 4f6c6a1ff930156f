//! JSON load/save for primary records.

use dymns_types::{DymnsError, Result, Storage};
use serde::{de::DeserializeOwned, Serialize};

/// Load and decode the record at `key`, `None` if absent.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &[u8]) -> Result<Option<T>> {
    storage
        .read(key)
        .map(|bytes| serde_json::from_slice(&bytes).map_err(DymnsError::from))
        .transpose()
}

/// Encode and write `value` at `key`.
pub fn save<T: Serialize>(storage: &mut dyn Storage, key: &[u8], value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    storage.write(key, &bytes);
    Ok(())
}

/// Decode every record under `prefix`, in key order.
pub fn load_all<T: DeserializeOwned>(storage: &dyn Storage, prefix: &[u8]) -> Result<Vec<T>> {
    storage
        .scan_prefix(prefix)
        .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(DymnsError::from))
        .collect()
}
