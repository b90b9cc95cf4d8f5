//! In-memory ledger state.
//!
//! Backs the line gateway and every test. Range queries return a snapshot
//! cursor; the ledger counts cursors that are still open so callers can
//! verify release on every path.

use crate::errors::LedgerError;
use crate::ports::outbound::{KeyValue, LedgerState, StateQueryIterator};
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory implementation of `LedgerState`.
pub struct InMemoryLedger {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_iterators: Arc<AtomicUsize>,
    unavailable: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            open_iterators: Arc::new(AtomicUsize::new(0)),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Number of range cursors handed out and not yet closed or dropped.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with `LedgerError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Copies the whole keyspace with values hex-encoded.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries
            .iter()
            .map(|(key, value)| (key.clone(), hex::encode(value)))
            .collect())
    }

    /// Replaces the keyspace with a snapshot taken by [`Self::snapshot`].
    pub fn restore(&self, snapshot: BTreeMap<String, String>) -> Result<(), LedgerError> {
        let mut decoded = BTreeMap::new();
        for (key, value) in snapshot {
            let bytes = hex::decode(&value).map_err(|err| LedgerError::WriteRejected {
                key: key.clone(),
                reason: err.to_string(),
            })?;
            decoded.insert(key, bytes);
        }
        let mut entries = self.entries.write().map_err(|_| LedgerError::LockPoisoned)?;
        *entries = decoded;
        Ok(())
    }

    fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable);
        }
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.ensure_available()?;
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.ensure_available()?;
        if key.is_empty() {
            return Err(LedgerError::WriteRejected {
                key: String::new(),
                reason: "empty key".to_string(),
            });
        }
        let mut entries = self.entries.write().map_err(|_| LedgerError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateQueryIterator>, LedgerError> {
        self.ensure_available()?;
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;

        let lower = if start_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start_key.to_string())
        };
        let upper = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key.to_string())
        };

        // BTreeMap::range panics on inverted bounds.
        let inverted = !start_key.is_empty() && !end_key.is_empty() && start_key >= end_key;
        let items: Vec<KeyValue> = if inverted {
            Vec::new()
        } else {
            entries
                .range((lower, upper))
                .map(|(key, value)| KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect()
        };

        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SnapshotIterator {
            items: items.into_iter().collect(),
            open_iterators: Arc::clone(&self.open_iterators),
            closed: false,
        }))
    }
}

/// Cursor over a copy of the range taken when the query was opened.
struct SnapshotIterator {
    items: VecDeque<KeyValue>,
    open_iterators: Arc<AtomicUsize>,
    closed: bool,
}

impl StateQueryIterator for SnapshotIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.items.is_empty()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.closed {
            return Err(LedgerError::Iterator("iterator already closed".to_string()));
        }
        self.items
            .pop_front()
            .ok_or_else(|| LedgerError::Iterator("no more entries".to_string()))
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.items.clear();
            self.open_iterators.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for SnapshotIterator {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
