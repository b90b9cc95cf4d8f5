//! # Invocation Router
//!
//! Entry point for hosts that call the contract by function name with
//! positional string arguments. Resolves the caller once per invocation and
//! dispatches to the typed [`RegistryApi`].

use crate::domain::entities::{Identity, NewUser, TransactionHistory, UserUpdate};
use crate::domain::rbac::Operation;
use crate::errors::ContractError;
use crate::identity::IdentityResolver;
use crate::ports::inbound::RegistryApi;
use crate::ports::outbound::ClientIdentity;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Positional argument count of each function.
fn arity(operation: Operation) -> usize {
    match operation {
        Operation::ProvisionDefaultUsers
        | Operation::GetAllUsers
        | Operation::AuthenticateUser => 0,
        Operation::UserExists
        | Operation::GetUser
        | Operation::DeactivateUser
        | Operation::GetTransactionHistory => 1,
        Operation::UpdateUser => 4,
        Operation::RecordTransactionHistory => 5,
        Operation::CreateUser => 7,
    }
}

/// Routes named invocations onto a [`RegistryApi`].
pub struct InvocationHandler<A: RegistryApi> {
    api: Arc<A>,
    resolver: IdentityResolver,
}

impl<A: RegistryApi> InvocationHandler<A> {
    pub fn new(api: Arc<A>, resolver: IdentityResolver) -> Self {
        Self { api, resolver }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Resolves the caller and runs `function` with `args`.
    pub fn invoke(
        &self,
        client: &dyn ClientIdentity,
        function: &str,
        args: &[String],
    ) -> Result<Value, ContractError> {
        let operation = Operation::from_function_name(function).ok_or_else(|| {
            ContractError::InvalidArgument(format!("unknown function '{function}'"))
        })?;
        let caller = self.resolver.resolve(client)?;
        self.dispatch(&caller, operation, args)
    }

    /// Runs an already-resolved invocation.
    pub fn dispatch(
        &self,
        caller: &Identity,
        operation: Operation,
        args: &[String],
    ) -> Result<Value, ContractError> {
        let expected = arity(operation);
        if args.len() != expected {
            return Err(ContractError::InvalidArgument(format!(
                "{} expects {expected} argument(s), got {}",
                operation.function_name(),
                args.len()
            )));
        }
        debug!(operation = %operation, caller = %caller.common_name, "Dispatching");

        let api = self.api.as_ref();
        let value = match operation {
            Operation::ProvisionDefaultUsers => json!(api.provision_default_users(caller)?),
            Operation::UserExists => json!(api.user_exists(caller, &args[0])?),
            Operation::CreateUser => {
                let new_user = NewUser {
                    id: args[0].clone(),
                    username: args[1].clone(),
                    role: args[2].clone(),
                    email: args[3].clone(),
                    national_id: args[4].clone(),
                    bank_branch: args[5].clone(),
                    registered_at: args[6].clone(),
                };
                json!(api.create_user(caller, new_user)?)
            }
            Operation::GetUser => json!(api.get_user(caller, &args[0])?),
            Operation::GetAllUsers => json!(api.get_all_users(caller)?),
            Operation::UpdateUser => {
                let update = UserUpdate::from_wire(&args[1], &args[2], &args[3]);
                json!(api.update_user(caller, &args[0], &update)?)
            }
            Operation::DeactivateUser => json!(api.deactivate_user(caller, &args[0])?),
            Operation::AuthenticateUser => json!(api.authenticate_user(caller)),
            Operation::RecordTransactionHistory => {
                let record = TransactionHistory {
                    deposit_user: args[0].clone(),
                    amount: args[1].clone(),
                    date: args[2].clone(),
                    time: args[3].clone(),
                    history_hash: args[4].clone(),
                };
                json!(api.record_transaction_history(caller, record)?)
            }
            Operation::GetTransactionHistory => {
                json!(api.get_transaction_history(caller, &args[0])?)
            }
        };
        Ok(value)
    }
}
