//! Cross-crate integration flows.

pub mod fixtures;

mod ledger_scan;
mod provisioning;
mod transaction_history;
mod user_lifecycle;
