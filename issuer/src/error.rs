//! Error types for the issuer.

use lekey_license::LicenseError;
use thiserror::Error;

/// Issuer-specific errors.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// Machine identifier failed the prefix check.
    #[error("invalid machine identifier: {0}")]
    InvalidMachineIdentifier(String),

    /// A required secret was not configured.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Any other licensing failure.
    #[error(transparent)]
    License(LicenseError),
}

impl From<LicenseError> for IssuerError {
    fn from(err: LicenseError) -> Self {
        match err {
            LicenseError::InvalidMachineIdentifier(reason) => Self::InvalidMachineIdentifier(reason),
            other => Self::License(other),
        }
    }
}

/// Result type for issuer operations.
pub type IssuerResult<T> = Result<T, IssuerError>;
