//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Machine identifier is empty or lacks the required prefix tag.
    #[error("invalid machine identifier: {0}")]
    InvalidMachineIdentifier(String),

    /// Candidate key is not 32 hex characters after normalization.
    #[error("invalid key format")]
    Malformed,

    /// Candidate key prefix does not match this machine.
    #[error("key does not match this machine")]
    Invalid,

    /// Secret or salt value rejected at construction.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// MAC initialisation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Activation state could not be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
