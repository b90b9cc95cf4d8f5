//! # Entity Store
//!
//! Typed access to users and transaction history on top of the raw
//! `LedgerState` port. Owns encoding, decoding, `data_hash` stamping and the
//! user range scan.

use crate::domain::entities::{TransactionHistory, User};
use crate::domain::record::{kinds, peek_kind, StoredRecord};
use crate::errors::{ContractError, LedgerError};
use crate::ports::outbound::{LedgerState, StateQueryIterator};
use std::sync::Arc;
use tracing::{debug, warn};

/// Typed repository over the flat ledger keyspace.
pub struct EntityStore<L: LedgerState> {
    ledger: Arc<L>,
}

impl<L: LedgerState> Clone for EntityStore<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: LedgerState> EntityStore<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Returns true if any record, of any kind, is stored under `key`.
    pub fn exists(&self, key: &str) -> Result<bool, ContractError> {
        if key.is_empty() {
            return Err(ContractError::InvalidArgument("id must not be empty".into()));
        }
        Ok(self.ledger.get_state(key)?.is_some())
    }

    /// Reads and decodes the user stored under `id`.
    pub fn get_user(&self, id: &str) -> Result<User, ContractError> {
        let bytes = self.read(id, "user")?;
        match StoredRecord::decode(&bytes) {
            Ok(StoredRecord::User(user)) => Ok(user),
            Ok(other) => Err(ContractError::DecodeError {
                key: id.to_string(),
                expected: "user",
                reason: format!("record holds a {}", other.entity()),
            }),
            Err(err) => Err(ContractError::DecodeError {
                key: id.to_string(),
                expected: "user",
                reason: err.to_string(),
            }),
        }
    }

    /// Restamps `data_hash` and writes the user under its id.
    pub fn put_user(&self, user: User) -> Result<User, ContractError> {
        let user = user.stamped();
        let key = user.id.clone();
        self.write(&key, StoredRecord::User(user.clone()))?;
        debug!(id = %key, data_hash = %user.data_hash, "Stored user");
        Ok(user)
    }

    /// Reads and decodes the transaction stored under `history_hash`.
    pub fn get_history(&self, history_hash: &str) -> Result<TransactionHistory, ContractError> {
        let bytes = self.read(history_hash, "transaction history")?;
        match StoredRecord::decode(&bytes) {
            Ok(StoredRecord::TransactionHistory(record)) => Ok(record),
            Ok(other) => Err(ContractError::DecodeError {
                key: history_hash.to_string(),
                expected: "transaction history",
                reason: format!("record holds a {}", other.entity()),
            }),
            Err(err) => Err(ContractError::DecodeError {
                key: history_hash.to_string(),
                expected: "transaction history",
                reason: err.to_string(),
            }),
        }
    }

    /// Writes the transaction under its `history_hash`, replacing any previous value.
    pub fn put_history(
        &self,
        record: TransactionHistory,
    ) -> Result<TransactionHistory, ContractError> {
        let key = record.history_hash.clone();
        self.write(&key, StoredRecord::TransactionHistory(record.clone()))?;
        Ok(record)
    }

    /// Opens a scan over every user record in the keyspace.
    pub fn scan_users(&self) -> Result<UserScan, ContractError> {
        let cursor = self.ledger.get_state_by_range("", "")?;
        Ok(UserScan::new(cursor))
    }

    fn read(&self, key: &str, entity: &'static str) -> Result<Vec<u8>, ContractError> {
        if key.is_empty() {
            return Err(ContractError::NotFound {
                entity,
                key: String::new(),
            });
        }
        self.ledger
            .get_state(key)?
            .ok_or_else(|| ContractError::NotFound {
                entity,
                key: key.to_string(),
            })
    }

    fn write(&self, key: &str, record: StoredRecord) -> Result<(), ContractError> {
        let bytes = record.encode().map_err(|err| LedgerError::WriteRejected {
            key: key.to_string(),
            reason: err.to_string(),
        })?;
        self.ledger.put_state(key, bytes)?;
        Ok(())
    }
}

// =============================================================================
// USER SCAN
// =============================================================================

/// Streaming view of the user records in a range cursor.
///
/// Records of other kinds are passed over silently; user-tagged records
/// that fail to decode are logged and skipped. The cursor is closed when the
/// scan is exhausted, fails, or is dropped.
pub struct UserScan {
    cursor: Box<dyn StateQueryIterator>,
    finished: bool,
    skipped: usize,
}

impl UserScan {
    fn new(cursor: Box<dyn StateQueryIterator>) -> Self {
        Self {
            cursor,
            finished: false,
            skipped: 0,
        }
    }

    /// Number of malformed user records passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Drains the scan and closes the cursor, surfacing a close failure.
    pub fn collect_users(mut self) -> Result<Vec<User>, ContractError> {
        let users = self.by_ref().collect::<Result<Vec<_>, _>>();
        self.finish()?;
        users
    }

    fn finish(&mut self) -> Result<(), LedgerError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.cursor.close()
    }
}

impl Iterator for UserScan {
    type Item = Result<User, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if !self.cursor.has_next() {
                return self.finish().err().map(|err| Err(err.into()));
            }

            let entry = match self.cursor.next_entry() {
                Ok(entry) => entry,
                Err(err) => {
                    if let Err(close_err) = self.finish() {
                        warn!(error = %close_err, "Failed to close range cursor");
                    }
                    return Some(Err(err.into()));
                }
            };

            if peek_kind(&entry.value).as_deref() != Some(kinds::USER) {
                continue;
            }
            match StoredRecord::decode(&entry.value) {
                Ok(StoredRecord::User(user)) => return Some(Ok(user)),
                Ok(_) => continue,
                Err(err) => {
                    self.skipped += 1;
                    warn!(key = %entry.key, error = %err, "Skipping malformed user record");
                }
            }
        }
    }
}

impl Drop for UserScan {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            warn!(error = %err, "Failed to close range cursor");
        }
    }
}
