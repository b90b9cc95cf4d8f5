//! # Registry Contract - Access-Controlled Identity Registry
//!
//! A registry of users and a log of transaction records kept in an external
//! key/value ledger. The contract decides who is calling, whether the call
//! is permitted, and keeps ledger state consistent.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Identity Resolver | `identity.rs` | Caller CN, role claim, tenant |
//! | RBAC Policy Engine | `domain/rbac.rs` | Per-operation allow-lists, provisioning table |
//! | Entity Store | `adapters/entity_store.rs` | Typed records over the ledger |
//! | Contract Operations | `service.rs` | The `RegistryApi` operation set |
//! | Invocation Router | `adapters/invocation.rs` | Function name + args to typed calls |
//!
//! ## Provisioning Table
//!
//! | Target role | Caller role required |
//! |-------------|---------------------|
//! | `Admin` | `SuperAdmin` |
//! | `Manager` | `SuperAdmin`, `Admin` |
//! | `User` | `SuperAdmin`, `Admin` |
//! | anything else | rejected as `InvalidRole` |
//!
//! ## Usage Example
//!
//! ```
//! use registry_contract::prelude::*;
//!
//! let contract = create_test_contract();
//! let root = Identity::new("root", Some("SuperAdmin".to_string()), "Org1MSP");
//!
//! let user = contract
//!     .create_user(
//!         &root,
//!         NewUser {
//!             id: "u9".into(),
//!             username: "Nimal".into(),
//!             role: "Admin".into(),
//!             ..NewUser::default()
//!         },
//!     )
//!     .unwrap();
//! assert_eq!(user.created_by, "root");
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Identity, NewUser, Role, SeedUser, TransactionHistory, User, UserUpdate,
    };

    // RBAC
    pub use crate::domain::rbac::{
        authorize, authorize_provisioning, require_role, AccessDecision, AccessPolicy,
        DenyReason, Operation, REGISTRY_ADMINS,
    };

    // Storage codec
    pub use crate::domain::record::StoredRecord;

    // Ports
    pub use crate::ports::inbound::RegistryApi;
    pub use crate::ports::outbound::{
        ClientIdentity, KeyValue, LedgerState, StateQueryIterator, X509Subject,
    };

    // Errors
    pub use crate::errors::{ContractError, ErrorKind, IdentityError, LedgerError};

    // Configuration
    pub use crate::config::{ContractConfig, DeactivationPolicy, DepositUserPolicy};

    // Adapters
    pub use crate::adapters::{
        EntityStore, InMemoryLedger, InvocationHandler, StaticClientIdentity,
    };

    // Services
    pub use crate::identity::IdentityResolver;
    pub use crate::service::{create_test_contract, RegistryContract};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
