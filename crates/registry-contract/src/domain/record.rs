//! # Stored Record Codec
//!
//! Users and transaction history share one flat keyspace. Every stored value
//! is a JSON object carrying an explicit `kind` discriminator so that range
//! scans can select records by kind instead of guessing from the shape.
//!
//! Decoding ignores fields the entity types do not know. Those fields are not
//! carried through: the next write of the record stores only the known
//! fields. Records written by this crate therefore round-trip exactly, while
//! foreign extra fields survive only until the record is rewritten.

use crate::domain::entities::{TransactionHistory, User};
use serde::{Deserialize, Serialize};

/// Discriminator values written into the `kind` field.
pub mod kinds {
    pub const USER: &str = "user";
    pub const TRANSACTION_HISTORY: &str = "transaction_history";
}

/// A value as persisted in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredRecord {
    User(User),
    TransactionHistory(TransactionHistory),
}

impl StoredRecord {
    /// Entity label used in error messages.
    #[must_use]
    pub fn entity(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::TransactionHistory(_) => "transaction history",
        }
    }

    /// Encodes the record.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the entity types hold only strings,
    /// bools and unit enums, so this does not fail in practice.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes a record of any kind. Unknown extra fields are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not JSON, carry no known `kind`, or the body
    /// does not match that kind.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Reads only the discriminator, without decoding the body.
///
/// Returns `None` for values that are not JSON objects or carry no string
/// `kind` field.
#[must_use]
pub fn peek_kind(bytes: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct Tag {
        kind: Option<String>,
    }
    serde_json::from_slice::<Tag>(bytes).ok()?.kind
}

// =============================================================================
// TESTS
// =============================================================================
