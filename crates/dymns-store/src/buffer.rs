//! A write buffer over a read-only base store.
//!
//! Reads see pending writes first, then the base. Nothing reaches the base
//! until the pending batch is applied, so dropping the buffer discards every
//! write made through it.

use std::collections::BTreeMap;

use dymns_types::{Record, Storage};

/// A pending write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert(Vec<u8>),
    Delete,
}

/// Pending writes keyed by store key.
pub type Batch = BTreeMap<Vec<u8>, Op>;

/// A [`Storage`] that buffers writes on top of `base`.
pub struct StoreBuffer<'a> {
    base: &'a dyn Storage,
    pending: Batch,
}

impl<'a> StoreBuffer<'a> {
    #[must_use]
    pub fn new(base: &'a dyn Storage) -> Self {
        Self {
            base,
            pending: Batch::new(),
        }
    }

    /// Number of keys touched so far.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Consume self, return the pending writes without applying them.
    #[must_use]
    pub fn into_batch(self) -> Batch {
        self.pending
    }
}

/// Apply a batch to `storage`, in key order.
pub fn apply(storage: &mut dyn Storage, batch: Batch) {
    for (key, op) in batch {
        match op {
            Op::Insert(value) => storage.write(&key, &value),
            Op::Delete => storage.remove(&key),
        }
    }
}

impl Storage for StoreBuffer<'_> {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(Op::Insert(value)) => Some(value.clone()),
            Some(Op::Delete) => None,
            None => self.base.read(key),
        }
    }

    fn scan_prefix<'b>(&'b self, prefix: &[u8]) -> Box<dyn Iterator<Item = Record> + 'b> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self.base.scan_prefix(prefix).collect();
        for (key, op) in self
            .pending
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match op {
                Op::Insert(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                Op::Delete => {
                    merged.remove(key);
                }
            }
        }
        Box::new(merged.into_iter())
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Insert(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Delete);
    }
}
