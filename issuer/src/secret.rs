//! The vendor-only issuance secret.

use crate::error::{IssuerError, IssuerResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The secret that keys the Body segment.
///
/// Lives only in this crate. The application crate has no type for it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IssuanceSecret {
    bytes: Vec<u8>,
}

impl IssuanceSecret {
    /// Creates a secret from a configured value.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::MissingConfig`] if the value is empty.
    pub fn new(value: impl Into<String>) -> IssuerResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(IssuerError::MissingConfig("issuance secret is empty".to_string()));
        }
        Ok(Self {
            bytes: value.into_bytes(),
        })
    }

    /// Returns the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for IssuanceSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
