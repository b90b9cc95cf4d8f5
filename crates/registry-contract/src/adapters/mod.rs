//! # Adapters Layer (Outer Hexagon)
//!
//! - `EntityStore`: typed users/history over `LedgerState`
//! - `InMemoryLedger`: `LedgerState` for the local gateway and tests
//! - `StaticClientIdentity`: `ClientIdentity` with known fields
//! - `InvocationHandler`: function-name router onto `RegistryApi`

pub mod entity_store;
pub mod invocation;
pub mod memory_ledger;
pub mod static_identity;

pub use entity_store::{EntityStore, UserScan};
pub use invocation::InvocationHandler;
pub use memory_ledger::InMemoryLedger;
pub use static_identity::StaticClientIdentity;
