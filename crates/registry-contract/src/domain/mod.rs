//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic: entities, the RBAC policy engine, common-name
//! parsing and the stored-record codec.
//! NO I/O, NO ledger access.

pub mod entities;
pub mod identity;
pub mod rbac;
pub mod record;

pub use entities::*;
pub use identity::*;
pub use rbac::*;
pub use record::*;
