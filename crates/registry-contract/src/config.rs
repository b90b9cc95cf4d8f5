//! # Contract Configuration
//!
//! Policy switches and seed data for the registry contract. Defaults match
//! the behaviour of the deployed contract; every field can be overridden
//! from the environment.

use crate::domain::entities::{Role, SeedUser};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Default name of the credential attribute holding the caller's role.
pub const DEFAULT_ROLE_ATTRIBUTE: &str = "role";

/// What `DeactivateUser` does with a user that is already inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeactivationPolicy {
    /// Rewrite the record and succeed.
    #[default]
    Idempotent,
    /// Fail with `AlreadyDeactivated`.
    RejectInactive,
}

impl FromStr for DeactivationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idempotent" => Ok(Self::Idempotent),
            "reject" | "reject_inactive" => Ok(Self::RejectInactive),
            _ => Err(ConfigError::InvalidValue {
                variable: "REGISTRY_DEACTIVATION_POLICY",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether a transaction's `deposit_user` must name a registered user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepositUserPolicy {
    /// Accept any non-empty value.
    #[default]
    Unchecked,
    /// Fail with `NotFound` unless a user record exists under that id.
    RequireRegisteredUser,
}

impl FromStr for DepositUserPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unchecked" => Ok(Self::Unchecked),
            "registered" | "require_registered_user" => Ok(Self::RequireRegisteredUser),
            _ => Err(ConfigError::InvalidValue {
                variable: "REGISTRY_DEPOSIT_USER_POLICY",
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value outside its accepted set.
    #[error("invalid value '{value}' for {variable}")]
    InvalidValue {
        variable: &'static str,
        value: String,
    },

    /// The role attribute name is empty.
    #[error("role attribute name must not be empty")]
    EmptyRoleAttribute,

    /// A seed user has an empty id.
    #[error("seed user at position {0} has an empty id")]
    EmptySeedId(usize),
}

/// Registry contract configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Credential attribute holding the caller's role.
    pub role_attribute: String,
    /// Re-deactivation behaviour.
    pub deactivation: DeactivationPolicy,
    /// Referential check on transaction deposit users.
    pub deposit_user: DepositUserPolicy,
    /// Records written by `ProvisionDefaultUsers`.
    pub seed_users: Vec<SeedUser>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            role_attribute: DEFAULT_ROLE_ATTRIBUTE.to_string(),
            deactivation: DeactivationPolicy::default(),
            deposit_user: DepositUserPolicy::default(),
            seed_users: default_seed_users(),
        }
    }
}

impl ContractConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRY_ROLE_ATTRIBUTE`: role claim name (default: role)
    /// - `REGISTRY_DEACTIVATION_POLICY`: `idempotent` | `reject` (default: idempotent)
    /// - `REGISTRY_DEPOSIT_USER_POLICY`: `unchecked` | `registered` (default: unchecked)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(attribute) = env::var("REGISTRY_ROLE_ATTRIBUTE") {
            config.role_attribute = attribute;
        }
        if let Ok(policy) = env::var("REGISTRY_DEACTIVATION_POLICY") {
            config.deactivation = policy.parse()?;
        }
        if let Ok(policy) = env::var("REGISTRY_DEPOSIT_USER_POLICY") {
            config.deposit_user = policy.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Replaces the seed users.
    #[must_use]
    pub fn with_seed_users(mut self, seed_users: Vec<SeedUser>) -> Self {
        self.seed_users = seed_users;
        self
    }

    /// Checks invariants the contract relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.role_attribute.is_empty() {
            return Err(ConfigError::EmptyRoleAttribute);
        }
        if let Some(position) = self.seed_users.iter().position(|seed| seed.id.is_empty()) {
            return Err(ConfigError::EmptySeedId(position));
        }
        Ok(())
    }
}

/// The two fixed seed records of the deployed registry.
#[must_use]
pub fn default_seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            id: "user1".to_string(),
            username: "Vidusha".to_string(),
            role: Role::Admin,
            email: "pgvidushadilshan@gmail.com".to_string(),
            national_id: "993140490v".to_string(),
            bank_branch: "Godakawela".to_string(),
            registered_at: "2025-07-31".to_string(),
        },
        SeedUser {
            id: "user2".to_string(),
            username: "Dilshan".to_string(),
            role: Role::User,
            email: "dilshanariyarathna1999@gmail.com".to_string(),
            national_id: "993140490".to_string(),
            bank_branch: "Godakawela".to_string(),
            registered_at: "2025-07-31".to_string(),
        },
    ]
}
