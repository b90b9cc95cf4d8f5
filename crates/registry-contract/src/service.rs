//! # Registry Contract Service
//!
//! Composes the identity, RBAC and entity-store layers into the operation set
//! of [`RegistryApi`]. Every operation receives the resolved caller
//! explicitly and runs as one unit of work against the ledger.
//!
//! ## Check Order
//!
//! 1. Required arguments (`InvalidArgument`)
//! 2. Target role, for `CreateUser` only (`InvalidRole`)
//! 3. Caller role (`NoRoleAttribute` / `PermissionDenied`)
//! 4. Ledger state (`NotFound` / `AlreadyExists` / `AlreadyDeactivated`)

use crate::adapters::{EntityStore, InMemoryLedger};
use crate::config::{ContractConfig, DeactivationPolicy, DepositUserPolicy};
use crate::domain::entities::{Identity, NewUser, TransactionHistory, User, UserUpdate};
use crate::domain::rbac::{authorize, authorize_provisioning, AccessDecision, Operation};
use crate::errors::ContractError;
use crate::ports::inbound::RegistryApi;
use crate::ports::outbound::LedgerState;

use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The registry contract bound to a ledger.
pub struct RegistryContract<L: LedgerState> {
    config: ContractConfig,
    store: EntityStore<L>,
}

impl<L: LedgerState> RegistryContract<L> {
    pub fn new(ledger: Arc<L>, config: ContractConfig) -> Self {
        Self {
            config,
            store: EntityStore::new(ledger),
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// The typed store, for callers that need direct reads.
    pub fn store(&self) -> &EntityStore<L> {
        &self.store
    }

    /// Applies an operation's generic access policy.
    fn authorize(&self, operation: Operation, caller: &Identity) -> Result<(), ContractError> {
        let decision = authorize(operation.policy(), caller.role.as_deref());
        self.enforce(operation, caller, decision)
    }

    fn enforce(
        &self,
        operation: Operation,
        caller: &Identity,
        decision: AccessDecision,
    ) -> Result<(), ContractError> {
        if let AccessDecision::Deny(reason) = &decision {
            warn!(
                operation = %operation,
                caller = %caller.common_name,
                role = %caller.role_label(),
                reason = reason.label(),
                "Access denied"
            );
        }
        decision.into_result(operation, &self.config.role_attribute)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ContractError> {
    if value.is_empty() {
        return Err(ContractError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Contract over a fresh in-memory ledger with default configuration.
pub fn create_test_contract() -> RegistryContract<InMemoryLedger> {
    RegistryContract::new(Arc::new(InMemoryLedger::new()), ContractConfig::default())
}

// =============================================================================
// RegistryApi Implementation
// =============================================================================

impl<L: LedgerState> RegistryApi for RegistryContract<L> {
    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn provision_default_users(&self, caller: &Identity) -> Result<Vec<User>, ContractError> {
        self.authorize(Operation::ProvisionDefaultUsers, caller)?;

        let mut written = Vec::with_capacity(self.config.seed_users.len());
        for seed in self.config.seed_users.iter().cloned() {
            written.push(self.store.put_user(seed.into_user(&caller.common_name))?);
        }

        info!(count = written.len(), "Provisioned default users");
        Ok(written)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn user_exists(&self, caller: &Identity, id: &str) -> Result<bool, ContractError> {
        self.authorize(Operation::UserExists, caller)?;
        self.store.exists(id)
    }

    #[instrument(
        skip(self, caller, new_user),
        fields(caller = %caller.common_name, id = %new_user.id, target_role = %new_user.role)
    )]
    fn create_user(&self, caller: &Identity, new_user: NewUser) -> Result<User, ContractError> {
        require_non_empty("id", &new_user.id)?;
        require_non_empty("username", &new_user.username)?;
        require_non_empty("role", &new_user.role)?;

        let (role, decision) = authorize_provisioning(caller.role.as_deref(), &new_user.role)?;
        self.enforce(Operation::CreateUser, caller, decision)?;

        if self.store.exists(&new_user.id)? {
            return Err(ContractError::AlreadyExists { id: new_user.id });
        }

        let user = self.store.put_user(User {
            id: new_user.id,
            username: new_user.username,
            role,
            email: new_user.email,
            national_id: new_user.national_id,
            bank_branch: new_user.bank_branch,
            is_active: true,
            registered_at: new_user.registered_at,
            created_by: caller.common_name.clone(),
            data_hash: String::new(),
        })?;

        info!(id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn get_user(&self, caller: &Identity, id: &str) -> Result<User, ContractError> {
        require_non_empty("id", id)?;
        self.authorize(Operation::GetUser, caller)?;
        self.store.get_user(id)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn get_all_users(&self, caller: &Identity) -> Result<Vec<User>, ContractError> {
        self.authorize(Operation::GetAllUsers, caller)?;
        self.store.scan_users()?.collect_users()
    }

    #[instrument(skip(self, caller, update), fields(caller = %caller.common_name))]
    fn update_user(
        &self,
        caller: &Identity,
        id: &str,
        update: &UserUpdate,
    ) -> Result<User, ContractError> {
        require_non_empty("id", id)?;
        self.authorize(Operation::UpdateUser, caller)?;

        let mut user = self.store.get_user(id)?;
        update.apply(&mut user);
        let user = self.store.put_user(user)?;

        info!(id = %user.id, changed = !update.is_empty(), "User updated");
        Ok(user)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn deactivate_user(&self, caller: &Identity, id: &str) -> Result<User, ContractError> {
        require_non_empty("id", id)?;
        self.authorize(Operation::DeactivateUser, caller)?;

        let mut user = self.store.get_user(id)?;
        if !user.is_active && self.config.deactivation == DeactivationPolicy::RejectInactive {
            return Err(ContractError::AlreadyDeactivated { id: user.id });
        }
        user.is_active = false;
        let user = self.store.put_user(user)?;

        info!(id = %user.id, "User deactivated");
        Ok(user)
    }

    fn authenticate_user(&self, caller: &Identity) -> String {
        caller.summary()
    }

    #[instrument(
        skip(self, caller, record),
        fields(caller = %caller.common_name, history_hash = %record.history_hash)
    )]
    fn record_transaction_history(
        &self,
        caller: &Identity,
        record: TransactionHistory,
    ) -> Result<TransactionHistory, ContractError> {
        require_non_empty("depositUser", &record.deposit_user)?;
        require_non_empty("amount", &record.amount)?;
        require_non_empty("historyHash", &record.history_hash)?;
        self.authorize(Operation::RecordTransactionHistory, caller)?;

        if self.config.deposit_user == DepositUserPolicy::RequireRegisteredUser {
            match self.store.get_user(&record.deposit_user) {
                Ok(_) => {}
                Err(ContractError::DecodeError { key, .. }) => {
                    return Err(ContractError::NotFound { entity: "user", key });
                }
                Err(err) => return Err(err),
            }
        }

        let record = self.store.put_history(record)?;
        info!(deposit_user = %record.deposit_user, "Transaction history recorded");
        Ok(record)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.common_name))]
    fn get_transaction_history(
        &self,
        caller: &Identity,
        history_hash: &str,
    ) -> Result<TransactionHistory, ContractError> {
        require_non_empty("historyHash", history_hash)?;
        self.authorize(Operation::GetTransactionHistory, caller)?;
        self.store.get_history(history_hash)
    }
}

// =============================================================================
// TESTS
// =============================================================================
