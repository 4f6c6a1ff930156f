//! Generic reverse-lookup index.
//!
//! Maps an opaque key to a sorted, deduplicated list of string IDs. Keys are
//! matched by exact byte equality; the index never scans by prefix, so keys
//! that are prefixes of each other stay isolated. An empty list is never
//! persisted: removing the last ID deletes the record.

use std::marker::PhantomData;

use dymns_types::{Result, Storage};

use crate::{codec::IndexCodec, keys};

/// A key → sorted set of IDs map, encoded with `C`.
pub struct ReverseIndex<C> {
    _codec: PhantomData<C>,
}

impl<C> Default for ReverseIndex<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ReverseIndex<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _codec: PhantomData,
        }
    }
}

impl<C: IndexCodec> ReverseIndex<C> {
    /// Add `id` under `key`. No write if it is already present.
    pub fn add(&self, storage: &mut dyn Storage, key: &[u8], id: &str) -> Result<()> {
        let mut ids = self.get(storage, key)?;
        match ids.binary_search_by(|existing| existing.as_str().cmp(id)) {
            Ok(_) => Ok(()),
            Err(pos) => {
                ids.insert(pos, id.to_string());
                storage.write(key, &C::encode(&ids)?);
                tracing::debug!(key = %keys::display(key), id, len = ids.len(), "reverse index add");
                Ok(())
            }
        }
    }

    /// All IDs under `key`, ascending. Empty if the key is absent.
    pub fn get(&self, storage: &dyn Storage, key: &[u8]) -> Result<Vec<String>> {
        match storage.read(key) {
            None => Ok(Vec::new()),
            Some(bytes) => {
                let mut ids = C::decode(&bytes)?;
                // tolerate records written unsorted by an older writer
                ids.sort_unstable();
                ids.dedup();
                Ok(ids)
            }
        }
    }

    /// Remove `id` from `key`. Deletes the record once it is empty.
    pub fn remove(&self, storage: &mut dyn Storage, key: &[u8], id: &str) -> Result<()> {
        let mut ids = self.get(storage, key)?;
        let Ok(pos) = ids.binary_search_by(|existing| existing.as_str().cmp(id)) else {
            return Ok(());
        };
        ids.remove(pos);
        if ids.is_empty() {
            storage.remove(key);
        } else {
            storage.write(key, &C::encode(&ids)?);
        }
        tracing::debug!(key = %keys::display(key), id, len = ids.len(), "reverse index remove");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dymns_types::MemStorage;

    use super::*;
    use crate::codec::OrderIds;

    const INDEX: ReverseIndex<OrderIds> = ReverseIndex::new();

    #[test]
    fn add_sorts_and_dedups() {
        let mut store = MemStorage::new();
        for id in ["103", "101", "102", "101"] {
            INDEX.add(&mut store, b"k", id).unwrap();
        }
        assert_eq!(INDEX.get(&store, b"k").unwrap(), vec!["101", "102", "103"]);
    }

    #[test]
    fn add_existing_does_not_write() {
        let mut store = MemStorage::new();
        INDEX.add(&mut store, b"k", "101").unwrap();
        let before = store.clone();
        INDEX.add(&mut store, b"k", "101").unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn get_missing_is_empty() {
        let store = MemStorage::new();
        assert!(INDEX.get(&store, b"nope").unwrap().is_empty());
    }

    #[test]
    fn remove_last_deletes_record() {
        let mut store = MemStorage::new();
        INDEX.add(&mut store, b"k", "101").unwrap();
        INDEX.add(&mut store, b"k", "102").unwrap();
        INDEX.remove(&mut store, b"k", "101").unwrap();
        assert_eq!(INDEX.get(&store, b"k").unwrap(), vec!["102"]);
        INDEX.remove(&mut store, b"k", "102").unwrap();
        assert_eq!(store.read(b"k"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = MemStorage::new();
        INDEX.remove(&mut store, b"k", "101").unwrap();
        assert!(store.is_empty());
        INDEX.add(&mut store, b"k", "101").unwrap();
        let before = store.clone();
        INDEX.remove(&mut store, b"k", "999").unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn unsorted_record_is_normalized_on_read() {
        let mut store = MemStorage::new();
        store.write(b"k", &OrderIds::encode(&["b".into(), "a".into(), "b".into()]).unwrap());
        assert_eq!(INDEX.get(&store, b"k").unwrap(), vec!["a", "b"]);
    }
}
