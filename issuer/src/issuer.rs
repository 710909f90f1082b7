//! License key generation.
//!
//! Computes both key segments for a machine identifier. Same input, same
//! key: re-running the issuer for a customer who lost their key reproduces
//! it exactly.

use crate::error::{IssuerError, IssuerResult};
use crate::secret::IssuanceSecret;
use lekey_license::{
    derive_prefix, keyed_segment, LicenseKey, MachineId, VerificationSalt, BODY_HEX_LEN,
};
use std::fmt;
use tracing::debug;

/// Computes the Body segment: the first 24 hex chars of
/// `HMAC-SHA256(issuance_secret, machine)`, uppercased.
///
/// # Errors
///
/// Propagates MAC failures from [`keyed_segment`].
pub fn derive_body(secret: &IssuanceSecret, machine: &MachineId) -> IssuerResult<String> {
    keyed_segment(secret.as_bytes(), machine, BODY_HEX_LEN).map_err(IssuerError::from)
}

/// A freshly issued key, ready to relay to the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLicense {
    /// Echo of the identifier the key was issued for.
    pub machine: MachineId,
    /// The issued key.
    pub key: LicenseKey,
}

impl fmt::Display for IssuedLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine ID:  {}", self.machine)?;
        write!(f, "License Key: {}", self.key)
    }
}

/// Holds both secrets and issues keys.
#[derive(Debug, Clone)]
pub struct Issuer {
    secret: IssuanceSecret,
    salt: VerificationSalt,
}

impl Issuer {
    /// Creates an issuer.
    #[must_use]
    pub fn new(secret: IssuanceSecret, salt: VerificationSalt) -> Self {
        Self { secret, salt }
    }

    /// Issues the license key for a machine identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IssuerError::InvalidMachineIdentifier`] if the
    /// identifier lacks the `LE-` tag. Nothing is computed in that case.
    pub fn generate_license_key(&self, machine_identifier: &str) -> IssuerResult<IssuedLicense> {
        let machine = MachineId::parse(machine_identifier)?;

        let prefix = derive_prefix(&self.salt, &machine)?;
        let body = derive_body(&self.secret, &machine)?;
        let key = LicenseKey::from_segments(&prefix, &body)?;

        debug!(machine = %machine, "issued license key");
        Ok(IssuedLicense { machine, key })
    }
}

/// Free-function form of [`Issuer::generate_license_key`].
///
/// # Errors
///
/// See [`Issuer::generate_license_key`].
pub fn generate_license_key(
    secret: &IssuanceSecret,
    salt: &VerificationSalt,
    machine_identifier: &str,
) -> IssuerResult<IssuedLicense> {
    Issuer::new(secret.clone(), salt.clone()).generate_license_key(machine_identifier)
}
