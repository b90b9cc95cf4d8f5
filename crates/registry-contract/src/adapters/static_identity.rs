//! Fixed caller identity, built in code or deserialized from a request.

use crate::errors::IdentityError;
use crate::ports::outbound::{ClientIdentity, X509Subject};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A caller identity whose fields are known up front.
///
/// Used by the line gateway, where the identity arrives as JSON next to the
/// function call, and by tests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticClientIdentity {
    pub id: String,
    pub msp_id: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub certificate: Option<X509Subject>,
}

impl StaticClientIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msp_id: msp_id.into(),
            attributes: HashMap::new(),
            certificate: None,
        }
    }

    /// Attaches a parsed certificate with the given common name.
    #[must_use]
    pub fn with_certificate(mut self, common_name: impl Into<String>) -> Self {
        self.certificate = Some(X509Subject {
            common_name: common_name.into(),
        });
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl ClientIdentity for StaticClientIdentity {
    fn id(&self) -> Result<String, IdentityError> {
        if self.id.is_empty() {
            return Err(IdentityError::Unreadable("empty subject".to_string()));
        }
        Ok(self.id.clone())
    }

    fn msp_id(&self) -> Result<String, IdentityError> {
        Ok(self.msp_id.clone())
    }

    fn attribute_value(&self, name: &str) -> Result<Option<String>, IdentityError> {
        Ok(self.attributes.get(name).cloned())
    }

    fn x509_certificate(&self) -> Result<Option<X509Subject>, IdentityError> {
        Ok(self.certificate.clone())
    }
}
