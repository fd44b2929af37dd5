//! Key-value storage under the exchange.
//!
//! ## Architecture
//!
//! The replicated runtime owns durable storage; the exchange only needs an
//! ordered key-value view of it:
//!
//! - [`KvStore`]: the contract every state transition is written against
//! - [`MemStore`]: ordered in-memory store (working and committed state)
//! - [`CacheStore`]: write-buffer overlay giving one transaction an atomic
//!   view; flushed on success, dropped on rejection
//!
//! ## Determinism
//!
//! Keys are kept in a `BTreeMap`, so every scan returns entries in ascending
//! byte order on every replica. Nothing in this module iterates a hash map.
//!
//! ## Example
//!
//! ```
//! use token_exchange::store::{CacheStore, KvStore, MemStore};
//!
//! let mut base = MemStore::new();
//! base.set(b"a", vec![1]);
//!
//! let writes = {
//!     let mut cache = CacheStore::new(&base);
//!     cache.set(b"b", vec![2]);
//!     cache.delete(b"a");
//!     cache.into_writes()
//! };
//! base.apply(writes);
//!
//! assert_eq!(base.get(b"a"), None);
//! assert_eq!(base.get(b"b"), Some(vec![2]));
//! ```

pub mod codec;
pub mod keys;

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// Buffered writes: `Some(value)` sets, `None` deletes.
pub type Writes = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Ordered key-value store.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: &[u8], value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

// ============================================================================
// MemStore
// ============================================================================

/// In-memory ordered store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flush a transaction's buffered writes.
    pub fn apply(&mut self, writes: Writes) {
        for (key, value) in writes {
            match value {
                Some(value) => {
                    self.data.insert(key, value);
                }
                None => {
                    self.data.remove(&key);
                }
            }
        }
    }

    /// SHA-256 over every entry in key order.
    ///
    /// Each key and value is prefixed with its little-endian `u64` length so
    /// that entry boundaries are unambiguous.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (key, value) in &self.data {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.data.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.data.remove(key);
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.data
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// ============================================================================
// CacheStore
// ============================================================================

/// Write-buffer overlay over a parent store.
///
/// Reads see the overlay first, then the parent. The parent is never touched;
/// callers take the buffered writes with [`CacheStore::into_writes`] and apply
/// them only when the transaction succeeds.
pub struct CacheStore<'a> {
    parent: &'a dyn KvStore,
    writes: Writes,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a dyn KvStore) -> Self {
        Self {
            parent,
            writes: Writes::new(),
        }
    }

    pub fn into_writes(self) -> Writes {
        self.writes
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.prefix_scan(prefix).into_iter().collect();

        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged.into_iter().collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
