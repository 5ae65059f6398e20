use std::fmt::{Debug, Formatter};

use cofecms_core::utils::Redact;

/// Credential for the CMS API.
///
/// `api_id` is sent with every request, `api_key` is the shared secret used to
/// sign it and never leaves the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Public api id.
    pub api_id: String,
    /// Shared secret for the HMAC signature.
    pub api_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_id", &Redact::from(&self.api_id))
            .field("api_key", &Redact::from(&self.api_key))
            .finish()
    }
}
