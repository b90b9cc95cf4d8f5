//! Shared fixtures for the integration flows.

use registry_contract::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A resolved caller holding `role`.
pub fn caller(common_name: &str, role: Role) -> Identity {
    Identity::new(common_name, Some(role.as_str().to_string()), "Org1MSP")
}

/// A resolved caller whose credential has no role claim.
pub fn anonymous(common_name: &str) -> Identity {
    Identity::new(common_name, None, "Org1MSP")
}

pub fn new_user(id: &str, username: &str, role: &str) -> NewUser {
    NewUser {
        id: id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        email: format!("{id}@example.com"),
        national_id: "990011223v".to_string(),
        bank_branch: "Colombo".to_string(),
        registered_at: "2025-01-01".to_string(),
    }
}

pub fn transaction(deposit_user: &str, amount: &str, history_hash: &str) -> TransactionHistory {
    TransactionHistory {
        deposit_user: deposit_user.to_string(),
        amount: amount.to_string(),
        date: "2025-01-01".to_string(),
        time: "10:00".to_string(),
        history_hash: history_hash.to_string(),
    }
}

/// A contract plus direct access to its ledger.
pub fn contract_with(
    config: ContractConfig,
) -> (RegistryContract<InMemoryLedger>, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    (RegistryContract::new(Arc::clone(&ledger), config), ledger)
}

// =============================================================================
// FAILING LEDGER
// =============================================================================

/// Wraps an `InMemoryLedger`; range cursors fail after `fail_after` entries.
///
/// Counts cursors opened and closed so tests can check release on error paths.
pub struct FlakyScanLedger {
    inner: InMemoryLedger,
    fail_after: usize,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl FlakyScanLedger {
    pub fn new(fail_after: usize) -> Self {
        Self {
            inner: InMemoryLedger::new(),
            fail_after,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LedgerState for FlakyScanLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.inner.put_state(key, value)
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateQueryIterator>, LedgerError> {
        let inner = self.inner.get_state_by_range(start_key, end_key)?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FlakyCursor {
            inner,
            remaining: self.fail_after,
            closed: Arc::clone(&self.closed),
            is_closed: false,
        }))
    }
}

struct FlakyCursor {
    inner: Box<dyn StateQueryIterator>,
    remaining: usize,
    closed: Arc<AtomicUsize>,
    is_closed: bool,
}

impl StateQueryIterator for FlakyCursor {
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.remaining == 0 {
            return Err(LedgerError::Iterator("peer connection reset".to_string()));
        }
        self.remaining -= 1;
        self.inner.next_entry()
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.close()
    }
}
