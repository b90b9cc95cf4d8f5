//! # RBAC Policy Engine
//!
//! Pure role → decision functions. Nothing here reads the ledger or the
//! caller-identity object; the resolved role claim is passed in.
//!
//! Policies are flat allow-lists per operation rather than a "role ≥ level"
//! comparison, because `Manager` and `User` are siblings and the tiers are not
//! totally ordered.

use crate::domain::entities::Role;
use crate::errors::ContractError;

// =============================================================================
// OPERATIONS
// =============================================================================

/// Roles allowed to read the full registry and mutate existing users.
pub const REGISTRY_ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Every externally callable contract operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ProvisionDefaultUsers,
    UserExists,
    CreateUser,
    GetUser,
    GetAllUsers,
    UpdateUser,
    DeactivateUser,
    AuthenticateUser,
    RecordTransactionHistory,
    GetTransactionHistory,
}

impl Operation {
    /// Every operation, in dispatch table order.
    pub const ALL: [Operation; 10] = [
        Operation::ProvisionDefaultUsers,
        Operation::UserExists,
        Operation::CreateUser,
        Operation::GetUser,
        Operation::GetAllUsers,
        Operation::UpdateUser,
        Operation::DeactivateUser,
        Operation::AuthenticateUser,
        Operation::RecordTransactionHistory,
        Operation::GetTransactionHistory,
    ];

    /// Function name callers invoke the operation by.
    #[must_use]
    pub fn function_name(self) -> &'static str {
        match self {
            Self::ProvisionDefaultUsers => "InitialUser",
            Self::UserExists => "UserExists",
            Self::CreateUser => "CreateUser",
            Self::GetUser => "GetUser",
            Self::GetAllUsers => "GetAllUsers",
            Self::UpdateUser => "UpdateUser",
            Self::DeactivateUser => "DeactivateUser",
            Self::AuthenticateUser => "AuthenticateUser",
            Self::RecordTransactionHistory => "CreateTransactionHistory",
            Self::GetTransactionHistory => "GetTransactionHistory",
        }
    }

    /// Looks up an operation by its function name.
    #[must_use]
    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.function_name() == name)
    }

    /// The generic access policy gating the operation.
    ///
    /// For `CreateUser` this is the floor checked by [`authorize_provisioning`]
    /// once the target role is known valid; the per-target allow-list from
    /// [`provisioners_for`] is applied on top.
    #[must_use]
    pub fn policy(self) -> AccessPolicy {
        match self {
            Self::ProvisionDefaultUsers
            | Self::GetAllUsers
            | Self::UpdateUser
            | Self::DeactivateUser => AccessPolicy::OneOf(REGISTRY_ADMINS),
            Self::CreateUser | Self::RecordTransactionHistory | Self::GetTransactionHistory => {
                AccessPolicy::AnyRole
            }
            Self::UserExists | Self::GetUser | Self::AuthenticateUser => AccessPolicy::Open,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.function_name())
    }
}

/// What a caller must present to run an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No role claim needed.
    Open,
    /// Some role claim must be present; its value is not checked.
    AnyRole,
    /// The role claim must name one of these roles.
    OneOf(&'static [Role]),
}

// =============================================================================
// DECISIONS
// =============================================================================

/// Outcome of an access check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

/// Why an access check failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// The credential carries no role claim.
    NoRoleAttribute,
    /// The role claim is outside the allowed set.
    RoleNotAllowed {
        caller_role: String,
        allowed: Vec<Role>,
    },
}

impl DenyReason {
    pub const NO_ROLE_ATTRIBUTE_LABEL: &'static str = "no_role_attribute";
    pub const ROLE_NOT_ALLOWED_LABEL: &'static str = "role_not_allowed";

    /// Short label for logs and metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoRoleAttribute => Self::NO_ROLE_ATTRIBUTE_LABEL,
            Self::RoleNotAllowed { .. } => Self::ROLE_NOT_ALLOWED_LABEL,
        }
    }
}

impl AccessDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a denial into the caller-facing error.
    pub fn into_result(
        self,
        operation: Operation,
        role_attribute: &str,
    ) -> Result<(), ContractError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::NoRoleAttribute) => Err(ContractError::NoRoleAttribute {
                attribute: role_attribute.to_string(),
            }),
            Self::Deny(DenyReason::RoleNotAllowed {
                caller_role,
                allowed,
            }) => Err(ContractError::PermissionDenied {
                operation: operation.function_name(),
                caller_role,
                allowed,
            }),
        }
    }
}

/// Checks a role claim against an allow-list.
///
/// Denies with `NoRoleAttribute` when no claim is present and with
/// `RoleNotAllowed` when the claim is absent from `allowed`, including claims
/// that name no known role at all.
#[must_use]
pub fn require_role(caller_role: Option<&str>, allowed: &[Role]) -> AccessDecision {
    let Some(claim) = caller_role else {
        return AccessDecision::Deny(DenyReason::NoRoleAttribute);
    };
    let permitted = claim
        .parse::<Role>()
        .is_ok_and(|role| allowed.contains(&role));
    if permitted {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::RoleNotAllowed {
            caller_role: claim.to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

/// Evaluates an operation's generic policy.
#[must_use]
pub fn authorize(policy: AccessPolicy, caller_role: Option<&str>) -> AccessDecision {
    match policy {
        AccessPolicy::Open => AccessDecision::Allow,
        AccessPolicy::AnyRole if caller_role.is_some() => AccessDecision::Allow,
        AccessPolicy::AnyRole => AccessDecision::Deny(DenyReason::NoRoleAttribute),
        AccessPolicy::OneOf(allowed) => require_role(caller_role, allowed),
    }
}

// =============================================================================
// PROVISIONING
// =============================================================================

/// Roles permitted to create a user with the `target` role.
///
/// `None` means the target cannot be provisioned through `CreateUser` at all.
#[must_use]
pub fn provisioners_for(target: Role) -> Option<&'static [Role]> {
    match target {
        Role::SuperAdmin => None,
        Role::Admin => Some(&[Role::SuperAdmin]),
        Role::Manager | Role::User => Some(REGISTRY_ADMINS),
    }
}

/// Decides whether a caller may create a user with the wire role `target`.
///
/// The target is validated first, so an unknown or unprovisionable target
/// fails with `InvalidRole` whoever the caller is.
pub fn authorize_provisioning(
    caller_role: Option<&str>,
    target: &str,
) -> Result<(Role, AccessDecision), ContractError> {
    let role: Role = target.parse()?;
    let allowed =
        provisioners_for(role).ok_or_else(|| ContractError::InvalidRole(target.to_string()))?;
    let floor = authorize(Operation::CreateUser.policy(), caller_role);
    if !floor.is_allowed() {
        return Ok((role, floor));
    }
    Ok((role, require_role(caller_role, allowed)))
}

// =============================================================================
// TESTS
// =============================================================================
