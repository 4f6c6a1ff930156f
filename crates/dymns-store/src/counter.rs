//! Monotonic `u64` counters stored under a single key.

use dymns_types::Storage;

/// A `u64` sequence persisted as 8 big-endian bytes.
///
/// A missing key reads as zero, so the first [`KeyCounter::increment`]
/// returns 1.
pub struct KeyCounter {
    key: Vec<u8>,
}

impl KeyCounter {
    #[must_use]
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    /// Current value.
    ///
    /// # Panics
    /// Panics if the stored value is not 8 bytes: the store is corrupted.
    #[must_use]
    pub fn get(&self, storage: &dyn Storage) -> u64 {
        match storage.read(&self.key) {
            None => 0,
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .unwrap_or_else(|_| panic!("corrupted counter at {}", crate::keys::display(&self.key)));
                u64::from_be_bytes(raw)
            }
        }
    }

    pub fn set(&self, storage: &mut dyn Storage, value: u64) {
        storage.write(&self.key, &value.to_be_bytes());
    }

    /// Advance by one and return the new value.
    ///
    /// # Panics
    /// Panics on overflow past `u64::MAX`.
    pub fn increment(&self, storage: &mut dyn Storage) -> u64 {
        let next = self
            .get(storage)
            .checked_add(1)
            .unwrap_or_else(|| panic!("counter overflow at {}", crate::keys::display(&self.key)));
        self.set(storage, next);
        next
    }
}
