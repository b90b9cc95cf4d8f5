//! # Error Types
//!
//! All error types for the registry contract, grouped by the boundary they
//! come from: the external ledger, the caller-identity object, and the
//! contract operations themselves.

use crate::domain::entities::Role;
use crate::domain::rbac::DenyReason;
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Failures reported by the external ledger runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger runtime could not be reached.
    #[error("ledger unavailable")]
    Unavailable,

    /// A lock guarding ledger state was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,

    /// The ledger rejected the write.
    #[error("ledger rejected write to '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    /// The range iterator failed mid-traversal or was used after close.
    #[error("range iterator error: {0}")]
    Iterator(String),
}

// =============================================================================
// IDENTITY ERRORS
// =============================================================================

/// Failures reading the caller-identity object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The identity object itself could not be read.
    #[error("caller identity unreadable: {0}")]
    Unreadable(String),

    /// An attribute lookup failed at the transport level.
    #[error("error reading attribute '{name}': {reason}")]
    Attribute { name: String, reason: String },
}

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors surfaced to callers of the contract operations.
///
/// Every variant carries enough context to diagnose the failure without
/// re-running the operation; nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Missing or malformed required input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No record stored under the key.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// Create was attempted on an occupied key. The key may hold a record of
    /// any kind.
    #[error("record {id} already exists")]
    AlreadyExists { id: String },

    /// The caller's role is not in the allowed set for the operation.
    #[error(
        "access denied for {operation}: caller role '{caller_role}' not in allowed set {allowed:?}"
    )]
    PermissionDenied {
        operation: &'static str,
        caller_role: String,
        allowed: Vec<Role>,
    },

    /// The requested target role cannot be provisioned.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// The caller's credential carries no role claim.
    #[error("caller has no '{attribute}' attribute in certificate")]
    NoRoleAttribute { attribute: String },

    /// The user is already inactive and the deactivation policy rejects repeats.
    #[error("user {id} is already deactivated")]
    AlreadyDeactivated { id: String },

    /// Stored bytes do not parse as the expected entity.
    #[error("cannot decode {expected} stored at '{key}': {reason}")]
    DecodeError {
        key: String,
        expected: &'static str,
        reason: String,
    },

    /// The caller-identity object could not be read.
    #[error("identity unavailable: {0}")]
    IdentityUnavailable(#[from] IdentityError),

    /// The external ledger call itself failed.
    #[error("upstream failure: {0}")]
    UpstreamFailure(#[from] LedgerError),
}

impl ContractError {
    /// Returns the closed error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InvalidRole(_) => ErrorKind::InvalidRole,
            Self::NoRoleAttribute { .. } => ErrorKind::NoRoleAttribute,
            Self::AlreadyDeactivated { .. } => ErrorKind::AlreadyDeactivated,
            Self::DecodeError { .. } => ErrorKind::DecodeError,
            Self::IdentityUnavailable(_) => ErrorKind::IdentityUnavailable,
            Self::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
        }
    }

    /// Returns true if the error is an RBAC rejection.
    #[must_use]
    pub fn is_access_denial(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::NoRoleAttribute { .. }
        )
    }

    /// The [`DenyReason`] label of an RBAC rejection, `None` otherwise.
    #[must_use]
    pub fn denial_label(&self) -> Option<&'static str> {
        match self {
            Self::NoRoleAttribute { .. } => Some(DenyReason::NO_ROLE_ATTRIBUTE_LABEL),
            Self::PermissionDenied { .. } => Some(DenyReason::ROLE_NOT_ALLOWED_LABEL),
            _ => None,
        }
    }
}

/// Stable classification of [`ContractError`], used for response payloads
/// and metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    InvalidRole,
    NoRoleAttribute,
    AlreadyDeactivated,
    DecodeError,
    IdentityUnavailable,
    UpstreamFailure,
}

impl ErrorKind {
    /// Snake-case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidRole => "invalid_role",
            Self::NoRoleAttribute => "no_role_attribute",
            Self::AlreadyDeactivated => "already_deactivated",
            Self::DecodeError => "decode_error",
            Self::IdentityUnavailable => "identity_unavailable",
            Self::UpstreamFailure => "upstream_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================
