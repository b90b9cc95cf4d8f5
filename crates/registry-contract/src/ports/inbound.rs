//! # Driving Ports (API - Inbound)
//!
//! The operation set exposed to callers. Every operation takes the resolved
//! caller [`Identity`] explicitly; nothing reads an ambient call context.

use crate::domain::entities::{Identity, NewUser, TransactionHistory, User, UserUpdate};
use crate::errors::ContractError;

/// Primary API of the registry contract.
///
/// Each call is one unit of work against the ledger. Atomicity of the
/// writes it performs is provided by the ledger host.
pub trait RegistryApi: Send + Sync {
    /// Writes the configured seed users, stamping `created_by` with the caller.
    ///
    /// Requires `SuperAdmin` or `Admin`. Re-running overwrites the same ids.
    fn provision_default_users(&self, caller: &Identity) -> Result<Vec<User>, ContractError>;

    /// Returns true if any record is stored under `id`.
    fn user_exists(&self, caller: &Identity, id: &str) -> Result<bool, ContractError>;

    /// Creates an active user, subject to the provisioning table.
    fn create_user(&self, caller: &Identity, new_user: NewUser) -> Result<User, ContractError>;

    /// Reads one user. Open to any caller.
    fn get_user(&self, caller: &Identity, id: &str) -> Result<User, ContractError>;

    /// Reads every user record in the ledger. Requires `SuperAdmin` or `Admin`.
    fn get_all_users(&self, caller: &Identity) -> Result<Vec<User>, ContractError>;

    /// Applies the non-empty overrides. Requires `SuperAdmin` or `Admin`.
    fn update_user(
        &self,
        caller: &Identity,
        id: &str,
        update: &UserUpdate,
    ) -> Result<User, ContractError>;

    /// Marks a user inactive. Requires `SuperAdmin` or `Admin`.
    fn deactivate_user(&self, caller: &Identity, id: &str) -> Result<User, ContractError>;

    /// Summarizes the caller's identity. No ledger access.
    fn authenticate_user(&self, caller: &Identity) -> String;

    /// Logs a transaction under its history hash; last writer wins.
    ///
    /// Requires only that the caller carries some role claim.
    fn record_transaction_history(
        &self,
        caller: &Identity,
        record: TransactionHistory,
    ) -> Result<TransactionHistory, ContractError>;

    /// Reads a logged transaction by its history hash.
    fn get_transaction_history(
        &self,
        caller: &Identity,
        history_hash: &str,
    ) -> Result<TransactionHistory, ContractError>;
}
