//! # Identity Resolver
//!
//! Turns the opaque caller-identity object into an [`Identity`] once per
//! invocation. The boundary layer resolves, then passes the result to the
//! contract operations explicitly.

use crate::domain::entities::Identity;
use crate::domain::identity::extract_common_name;
use crate::errors::IdentityError;
use crate::ports::outbound::ClientIdentity;
use tracing::debug;

/// Resolves callers using a configured role attribute name.
#[derive(Clone, Debug)]
pub struct IdentityResolver {
    role_attribute: String,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(role_attribute: impl Into<String>) -> Self {
        Self {
            role_attribute: role_attribute.into(),
        }
    }

    /// Name of the attribute read as the role claim.
    #[must_use]
    pub fn role_attribute(&self) -> &str {
        &self.role_attribute
    }

    /// Resolves common name, role claim and tenant id.
    ///
    /// A missing role claim is not an error; it yields `role: None`.
    ///
    /// # Errors
    ///
    /// Fails only when the identity object itself cannot be read.
    pub fn resolve(&self, client: &dyn ClientIdentity) -> Result<Identity, IdentityError> {
        let common_name = resolve_common_name(client)?;
        let role = client.attribute_value(&self.role_attribute)?;
        let tenant_id = client.msp_id()?;

        debug!(
            common_name = %common_name,
            role_found = role.is_some(),
            tenant_id = %tenant_id,
            "Resolved caller identity"
        );

        Ok(Identity {
            common_name,
            role,
            tenant_id,
        })
    }
}

/// Prefers the parsed certificate's CN, falling back to the subject string.
fn resolve_common_name(client: &dyn ClientIdentity) -> Result<String, IdentityError> {
    match client.x509_certificate() {
        Ok(Some(subject)) if !subject.common_name.is_empty() => {
            return Ok(subject.common_name);
        }
        Ok(_) => {}
        Err(err) => {
            debug!(error = %err, "Certificate unavailable, parsing subject string");
        }
    }
    let subject = client.id()?;
    Ok(extract_common_name(&subject).to_string())
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ROLE_ATTRIBUTE)
    }
}

// =============================================================================
// TESTS
// =============================================================================
