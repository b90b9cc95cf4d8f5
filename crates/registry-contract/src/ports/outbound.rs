//! # Driven Ports (SPI - Outbound)
//!
//! The two capabilities the contract consumes from its host runtime:
//! - Key/value state of the ledger
//! - The identity object of the current caller
//!
//! Storage durability, ordering and certificate trust are the host's concern.

use crate::errors::{IdentityError, LedgerError};
use serde::{Deserialize, Serialize};

// =============================================================================
// LEDGER STATE
// =============================================================================

/// One entry yielded by a range query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Key/value interface of the external ledger.
///
/// Writes become visible when the host commits the invocation; this trait
/// only states what the contract asks for.
pub trait LedgerState: Send + Sync {
    /// Returns the value at `key`, `None` if nothing is stored.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Stores `value` at `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Opens a cursor over keys in `[start_key, end_key)`.
    ///
    /// Empty strings leave the corresponding bound open, so `("", "")`
    /// covers the whole keyspace.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateQueryIterator>, LedgerError>;
}

/// A scoped cursor over a range query.
///
/// The cursor holds host resources until `close` is called.
pub trait StateQueryIterator: Send {
    /// Returns true if another entry is available.
    fn has_next(&self) -> bool;

    /// Advances the cursor.
    fn next_entry(&mut self) -> Result<KeyValue, LedgerError>;

    /// Releases the cursor. Further calls to `next_entry` fail.
    fn close(&mut self) -> Result<(), LedgerError>;
}

// =============================================================================
// CALLER IDENTITY
// =============================================================================

/// Subject of a parsed X.509 certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Subject {
    pub common_name: String,
}

/// The identity object presented with an invocation.
pub trait ClientIdentity {
    /// Raw subject / id string, e.g. `x509::CN=alice::CN=ca.org1`.
    fn id(&self) -> Result<String, IdentityError>;

    /// Tenant (MSP) identifier.
    fn msp_id(&self) -> Result<String, IdentityError>;

    /// Looks up a credential attribute, `None` if the claim is absent.
    fn attribute_value(&self, name: &str) -> Result<Option<String>, IdentityError>;

    /// The parsed certificate, if the identity exposes one.
    fn x509_certificate(&self) -> Result<Option<X509Subject>, IdentityError>;
}
