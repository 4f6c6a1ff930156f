//! Raw key-value storage used by every repository and index.

use std::collections::BTreeMap;

/// A key-value pair.
pub type Record = (Vec<u8>, Vec<u8>);

/// A byte-keyed KV store with ordered prefix iteration.
pub trait Storage {
    /// Read a single value. `None` if the key doesn't exist.
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Iterate every record whose key starts with `prefix`, in ascending
    /// byte order of the key.
    fn scan_prefix<'a>(&'a self, prefix: &[u8]) -> Box<dyn Iterator<Item = Record> + 'a>;

    /// Write a single key-value pair.
    fn write(&mut self, key: &[u8], value: &[u8]);

    /// Delete a single key. No-op if the key doesn't exist.
    fn remove(&mut self, key: &[u8]);
}

/// An in-memory [`Storage`] backed by a `BTreeMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStorage {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Storage for MemStorage {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn scan_prefix<'a>(&'a self, prefix: &[u8]) -> Box<dyn Iterator<Item = Record> + 'a> {
        let prefix = prefix.to_vec();
        Box::new(
            self.data
                .range(prefix.clone()..)
                .take_while(move |(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.data.insert(key.to_vec(), value.to_vec());
    }

    fn remove(&mut self, key: &[u8]) {
        self.data.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_remove() {
        let mut store = MemStorage::new();
        assert_eq!(store.read(b"k"), None);
        store.write(b"k", b"v");
        assert_eq!(store.read(b"k"), Some(b"v".to_vec()));
        store.remove(b"k");
        assert_eq!(store.read(b"k"), None);
        store.remove(b"k");
        assert!(store.is_empty());
    }

    #[test]
    fn scan_prefix_is_ordered_and_bounded() {
        let mut store = MemStorage::new();
        store.write(&[1, 3], b"c");
        store.write(&[1, 1], b"a");
        store.write(&[2, 0], b"x");
        store.write(&[1, 2], b"b");
        store.write(&[0, 9], b"y");

        let keys: Vec<Vec<u8>> = store.scan_prefix(&[1]).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![vec![1, 1], vec![1, 2], vec![1, 3]]);
        assert_eq!(store.scan_prefix(&[]).count(), 5);
        assert_eq!(store.scan_prefix(&[3]).count(), 0);
    }
}
