//! # Core Domain Entities
//!
//! The persisted entities (`User`, `TransactionHistory`), the closed `Role`
//! set, and the per-call caller `Identity`.

use crate::errors::ContractError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ROLE
// =============================================================================

/// Authorization tier of a registered user or a caller.
///
/// Converted from and to its wire string only at the boundary; inside the
/// contract every decision matches on the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    User,
}

impl Role {
    /// Every role, highest tier first.
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Manager, Role::User];

    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SuperAdmin",
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ContractError;

    /// Parses the exact, case-sensitive wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ContractError::InvalidRole(s.to_string()))
    }
}

// =============================================================================
// USER
// =============================================================================

/// A registered identity, stored under its `id`.
///
/// `role` never changes after creation and `is_active` only moves from
/// `true` to `false`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub national_id: String,
    pub bank_branch: String,
    pub is_active: bool,
    pub registered_at: String,
    pub created_by: String,
    /// Hex SHA-256 over every other field, restamped on each write.
    #[serde(default)]
    pub data_hash: String,
}

impl User {
    /// Computes the content fingerprint stored in `data_hash`.
    ///
    /// Fields are length-prefixed so that adjacent values cannot run together.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for field in [
            self.id.as_str(),
            self.username.as_str(),
            self.role.as_str(),
            self.email.as_str(),
            self.national_id.as_str(),
            self.bank_branch.as_str(),
            self.registered_at.as_str(),
            self.created_by.as_str(),
        ] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update([u8::from(self.is_active)]);
        hex::encode(hasher.finalize())
    }

    /// Returns a copy with `data_hash` recomputed from the current content.
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.data_hash = self.content_hash();
        self
    }
}

/// Input to `CreateUser`, with the target role still in wire form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub email: String,
    pub national_id: String,
    pub bank_branch: String,
    pub registered_at: String,
}

/// A fixed record written by `ProvisionDefaultUsers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub national_id: String,
    pub bank_branch: String,
    pub registered_at: String,
}

impl SeedUser {
    /// Builds the active user record, stamped with its creator.
    #[must_use]
    pub fn into_user(self, created_by: &str) -> User {
        User {
            id: self.id,
            username: self.username,
            role: self.role,
            email: self.email,
            national_id: self.national_id,
            bank_branch: self.bank_branch,
            is_active: true,
            registered_at: self.registered_at,
            created_by: created_by.to_string(),
            data_hash: String::new(),
        }
    }
}

/// Overrides accepted by `UpdateUser`. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bank_branch: Option<String>,
}

impl UserUpdate {
    /// Builds an update from wire arguments, where the empty string means
    /// "leave unchanged" rather than "clear".
    #[must_use]
    pub fn from_wire(username: &str, email: &str, bank_branch: &str) -> Self {
        let keep_if_set = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            username: keep_if_set(username),
            email: keep_if_set(email),
            bank_branch: keep_if_set(bank_branch),
        }
    }

    /// Returns true if no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.bank_branch.is_none()
    }

    /// Applies the overrides in place.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(bank_branch) = &self.bank_branch {
            user.bank_branch.clone_from(bank_branch);
        }
    }
}

// =============================================================================
// TRANSACTION HISTORY
// =============================================================================

/// One logged transaction, stored under its caller-supplied `history_hash`.
///
/// `deposit_user` names a user id by convention only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistory {
    pub deposit_user: String,
    pub amount: String,
    pub date: String,
    pub time: String,
    pub history_hash: String,
}

// =============================================================================
// IDENTITY
// =============================================================================

/// The resolved caller of one invocation. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Common name from the caller's certificate subject.
    pub common_name: String,
    /// Raw role claim, `None` if the credential carries none.
    pub role: Option<String>,
    /// MSP / tenant identifier.
    pub tenant_id: String,
}

impl Identity {
    /// Placeholder reported for callers without a role claim.
    pub const NO_ROLE: &'static str = "none";

    #[must_use]
    pub fn new(
        common_name: impl Into<String>,
        role: Option<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            role,
            tenant_id: tenant_id.into(),
        }
    }

    /// Returns true if the credential carries a role claim.
    #[must_use]
    pub fn role_found(&self) -> bool {
        self.role.is_some()
    }

    /// The role claim, or `"none"`.
    #[must_use]
    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or(Self::NO_ROLE)
    }

    /// `CN=<cn>, MSP=<tenant>, role=<role|none>`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "CN={}, MSP={}, role={}",
            self.common_name,
            self.tenant_id,
            self.role_label()
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
