//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the registry domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `RegistryApi`
//! - **Driven Ports (Outbound)**: `LedgerState`, `StateQueryIterator`, `ClientIdentity`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
