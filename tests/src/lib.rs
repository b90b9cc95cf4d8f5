//! # Identity Registry Test Suite
//!
//! Cross-crate flows that exercise the contract through its public API and
//! through the node gateway.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs             # Callers, inputs, failing ledger double
//!     ├── provisioning.rs         # Provisioning table and role validation
//!     ├── user_lifecycle.rs       # Read, update, deactivate
//!     ├── transaction_history.rs  # Recording and last-write-wins
//!     ├── ledger_scan.rs          # Range scan and cursor release
//!     └── gateway_flows.rs        # JSON line gateway end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p registry-tests
//! cargo test -p registry-tests integration::provisioning::
//! ```

pub mod integration;
